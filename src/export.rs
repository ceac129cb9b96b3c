use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::record::{ErrorRecord, ProductRecord};

pub fn write_products(path: &Path, products: &[ProductRecord]) -> Result<()> {
    write_json(path, products)?;
    info!("Wrote {} products to {}", products.len(), path.display());
    Ok(())
}

pub fn write_errors(path: &Path, errors: &[ErrorRecord]) -> Result<()> {
    write_json(path, errors)?;
    info!("Wrote {} row errors to {}", errors.len(), path.display());
    Ok(())
}

/// Pretty-printed UTF-8 JSON array; non-ASCII text is written as-is.
fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    let mut json = serde_json::to_string_pretty(items)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
