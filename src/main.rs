mod export;
mod parser;
mod record;
mod report;
mod settings;
mod sheet;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "inventory_import",
    about = "Normalize an inventory spreadsheet into product JSON for import"
)]
pub struct Cli {
    /// Config file (TOML); defaults to ./inventory.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Inventory spreadsheet (.xlsx, .xls, .ods or .csv)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Products JSON destination
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write row errors as JSON
    #[arg(long)]
    errors_output: Option<PathBuf>,
    /// Worksheet name (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,
    /// Leading presentation rows to skip
    #[arg(long)]
    skip_rows: Option<usize>,
    /// dateAdded stamped on every product (YYYY-MM-DD, default: today)
    #[arg(long)]
    date_added: Option<String>,
    /// Process and report without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    println!("Processing {}...", settings.input.display());
    let rows = sheet::read_rows(&settings.input, settings.sheet.as_deref(), settings.skip_rows)?;
    println!("Found {} rows", rows.len());

    let batch = process_sheet(&rows, &settings)?;
    println!(
        "Processed {} products ({} skipped, {} errors)",
        batch.products.len(),
        batch.skipped,
        batch.errors.len()
    );

    if settings.dry_run {
        println!("Dry run: nothing written.");
    } else {
        export::write_products(&settings.output, &batch.products)?;
        println!("Saved to {}", settings.output.display());
        if let Some(path) = &settings.errors_output {
            export::write_errors(path, &batch.errors)?;
            println!("Errors saved to {}", path.display());
        }
    }

    report::Summary::from_batch(&batch).print(
        &batch,
        settings.sample_errors,
        settings.sample_products,
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn process_sheet(
    rows: &[record::RawRow],
    settings: &Settings,
) -> anyhow::Result<parser::Batch> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    let batch = parser::process_rows(rows, &settings.filter, &settings.date_added_str(), |_| {
        pb.inc(1)
    });

    pb.finish_and_clear();
    Ok(batch)
}
