use crate::parser::Batch;
use crate::record::Status;

/// End-of-run counts printed to the console.
#[derive(Debug, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub available: usize,
    pub sold: usize,
    pub low_stock: usize,
    pub with_notes: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl Summary {
    pub fn from_batch(batch: &Batch) -> Self {
        let count = |status: Status| batch.products.iter().filter(|p| p.status == status).count();
        Summary {
            total: batch.products.len(),
            available: count(Status::Available),
            sold: count(Status::Sold),
            low_stock: count(Status::LowStock),
            with_notes: batch.products.iter().filter(|p| !p.notes.is_empty()).count(),
            skipped: batch.skipped,
            errors: batch.errors.len(),
        }
    }

    pub fn print(&self, batch: &Batch, sample_errors: usize, sample_products: usize) {
        if !batch.errors.is_empty() {
            println!("{} rows had errors:", self.errors);
            for e in batch.errors.iter().take(sample_errors) {
                println!(
                    "  - Row {}: {} - {}",
                    e.row,
                    e.name.as_deref().unwrap_or("Unknown"),
                    e.error
                );
            }
            if self.errors > sample_errors {
                println!("  ... and {} more", self.errors - sample_errors);
            }
        }

        println!("\nSummary:");
        println!("  Total products: {}", self.total);
        println!("  Available:      {}", self.available);
        println!("  Sold:           {}", self.sold);
        println!("  Low stock:      {}", self.low_stock);
        println!("  With notes:     {}", self.with_notes);
        println!("  Skipped rows:   {}", self.skipped);
        println!("  Errors:         {}", self.errors);

        if sample_products > 0 && !batch.products.is_empty() {
            println!("\nSample products:");
            for (i, p) in batch.products.iter().take(sample_products).enumerate() {
                println!(
                    "  {}. {} - Qty: {} - Status: {}",
                    i + 1,
                    truncate(&p.name, 40),
                    p.quantity,
                    p.status
                );
            }
        }
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{process_rows, RowFilter};
    use crate::sheet::read_rows;

    #[test]
    fn fixture_counts() {
        let rows = read_rows(std::path::Path::new("tests/fixtures/inventory.csv"), None, 2).unwrap();
        let batch = process_rows(&rows, &RowFilter::default(), "2026-01-29", |_| {});
        assert_eq!(
            Summary::from_batch(&batch),
            Summary {
                total: 8,
                available: 3,
                sold: 3,
                low_stock: 2,
                with_notes: 5,
                skipped: 5,
                errors: 1,
            }
        );
    }

    #[test]
    fn empty_batch() {
        let s = Summary::from_batch(&Batch::default());
        assert_eq!(s.total, 0);
        assert_eq!(s.errors, 0);
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Collar", 40), "Collar");
        assert_eq!(truncate("Corazón dorado", 7), "Corazón...");
    }
}
