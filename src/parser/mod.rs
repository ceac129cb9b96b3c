pub mod price;
pub mod profit;
pub mod quantity;
pub mod status;

use thiserror::Error;
use tracing::{debug, warn};

use crate::record::{Cell, Category, ErrorRecord, ProductRecord, RawRow, COLUMNS};

/// Failures that abort a single row. Recoverable junk degrades to defaults instead.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("{field}: value {value:?} does not fit in a 64-bit integer")]
    OutOfRange { field: &'static str, value: String },
    #[error("Cantidad: negative quantity {0}")]
    NegativeQuantity(i64),
}

/// Header/banner rows that share the name column with real products.
#[derive(Debug, Clone)]
pub struct RowFilter {
    pub denylist: Vec<String>,
    pub skip_prefixes: Vec<String>,
}

impl Default for RowFilter {
    fn default() -> Self {
        RowFilter {
            denylist: ["Nombre", "DIA DEL PADRE", "Nuevo ", "DIA DE LA MADRE", "NUEVO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_prefixes: vec!["NUEVO".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    Denylisted,
    Prefixed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingName => write!(f, "missing name"),
            SkipReason::Denylisted => write!(f, "denylisted name"),
            SkipReason::Prefixed => write!(f, "skipped prefix"),
        }
    }
}

impl RowFilter {
    /// Returns the trimmed product name, or why the row is not a product.
    pub fn accept(&self, name: Option<&Cell>) -> Result<String, SkipReason> {
        let name = name
            .map(|c| c.as_text().trim().to_string())
            .filter(|n| !n.is_empty() && n.to_lowercase() != "nan")
            .ok_or(SkipReason::MissingName)?;

        if self.denylist.iter().any(|d| *d == name) {
            return Err(SkipReason::Denylisted);
        }
        if self.skip_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return Err(SkipReason::Prefixed);
        }
        Ok(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Product(ProductRecord),
    Skipped(SkipReason),
    Failed(ErrorRecord),
}

/// Skip rules, then quantity → prices → profit → status → record.
pub fn process_row(row: &RawRow, filter: &RowFilter, date_added: &str) -> RowOutcome {
    let name = match filter.accept(row.name.as_ref()) {
        Ok(name) => name,
        Err(reason) => return RowOutcome::Skipped(reason),
    };

    match build_product(name, row, date_added) {
        Ok(product) => RowOutcome::Product(product),
        Err(e) => RowOutcome::Failed(ErrorRecord {
            row: row.line,
            name: row.name.as_ref().map(Cell::as_text),
            error: e.to_string(),
        }),
    }
}

fn build_product(name: String, row: &RawRow, date_added: &str) -> Result<ProductRecord, FieldError> {
    let (quantity, notes) = quantity::parse(row.quantity.as_ref())?;
    let store_price = price::normalize(row.store_price.as_ref(), COLUMNS[2])?;
    let suggested_price = price::normalize(row.suggested_price.as_ref(), COLUMNS[3])?;
    let profit_percentage = profit::resolve(row.profit.as_ref(), store_price, suggested_price);

    Ok(ProductRecord {
        name,
        quantity,
        store_price,
        suggested_price,
        profit_percentage,
        category: Category::Other,
        status: status::classify(quantity),
        notes,
        date_added: date_added.to_string(),
    })
}

/// Append-only results of one run, in source order.
#[derive(Debug, Default, PartialEq)]
pub struct Batch {
    pub products: Vec<ProductRecord>,
    pub errors: Vec<ErrorRecord>,
    pub skipped: usize,
}

impl Batch {
    pub fn record(&mut self, line: usize, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Product(p) => self.products.push(p),
            RowOutcome::Skipped(reason) => {
                debug!(line, %reason, "row skipped");
                self.skipped += 1;
            }
            RowOutcome::Failed(e) => {
                warn!("Row {} ({}) failed: {}", e.row, e.name.as_deref().unwrap_or("?"), e.error);
                self.errors.push(e);
            }
        }
    }
}

/// Process every row in order; `on_row` fires after each one.
pub fn process_rows(
    rows: &[RawRow],
    filter: &RowFilter,
    date_added: &str,
    mut on_row: impl FnMut(&RawRow),
) -> Batch {
    let mut batch = Batch::default();
    for row in rows {
        batch.record(row.line, process_row(row, filter, date_added));
        on_row(row);
    }
    batch
}

// ── Numeric helpers shared by the field parsers ──

pub(crate) enum Whole {
    Value(i64),
    NonFinite,
    OutOfRange,
}

/// Parse text as a float the way a spreadsheet user writes it: surrounding
/// whitespace, sign, decimals, exponents, `inf`/`nan`.
pub(crate) fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Truncate toward zero into an i64.
pub(crate) fn truncate(value: f64) -> Whole {
    if !value.is_finite() {
        return Whole::NonFinite;
    }
    let t = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return Whole::OutOfRange;
    }
    Whole::Value(t as i64)
}

/// Direct numeric reading of a cell: numbers as-is, text when it is entirely a number.
pub(crate) fn cell_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(t) => parse_float(t),
        Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
    }
}

// ── Tests ──
