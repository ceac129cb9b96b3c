use super::{cell_number, truncate, Whole};
use crate::record::Cell;

/// Profit over store price, in whole percent. Ties round to even (12.5 → 12).
pub fn calculate(store_price: i64, suggested_price: i64) -> i64 {
    if store_price == 0 {
        return 0;
    }
    let store = store_price as f64;
    let pct = (suggested_price as f64 - store) / store * 100.0;
    pct.round_ties_even() as i64
}

/// Use the sheet's own profit column when it holds a number, else compute it.
pub fn resolve(cell: Option<&Cell>, store_price: i64, suggested_price: i64) -> i64 {
    match cell.and_then(cell_number).map(truncate) {
        Some(Whole::Value(v)) => v,
        _ => calculate(store_price, suggested_price),
    }
}
