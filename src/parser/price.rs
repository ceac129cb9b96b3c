use super::{cell_number, parse_float, truncate, FieldError, Whole};
use crate::record::Cell;

/// Coerce a price cell to a whole number. Junk around the digits is stripped
/// ("$1,250.00" → 1250); anything still unreadable becomes 0. Negative numbers pass through.
pub fn normalize(cell: Option<&Cell>, field: &'static str) -> Result<i64, FieldError> {
    let Some(cell) = cell else {
        return Ok(0);
    };

    if let Some(n) = cell_number(cell) {
        match truncate(n) {
            Whole::Value(v) => return Ok(v),
            Whole::OutOfRange => return Err(out_of_range(field, cell)),
            Whole::NonFinite => {}
        }
    }

    let raw = cell.as_text();
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Ok(0);
    }

    match parse_float(&cleaned).map(truncate) {
        Some(Whole::Value(v)) => Ok(v),
        Some(_) => Err(out_of_range(field, cell)),
        None => Ok(0),
    }
}

fn out_of_range(field: &'static str, cell: &Cell) -> FieldError {
    FieldError::OutOfRange {
        field,
        value: cell.as_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: &str = "Precio_Tienda";

    fn norm(s: &str) -> i64 {
        normalize(Some(&Cell::Text(s.to_string())), FIELD).unwrap()
    }

    #[test]
    fn absent_is_zero() {
        assert_eq!(normalize(None, FIELD).unwrap(), 0);
    }

    #[test]
    fn numbers() {
        assert_eq!(normalize(Some(&Cell::Number(350.0)), FIELD).unwrap(), 350);
        assert_eq!(normalize(Some(&Cell::Number(99.99)), FIELD).unwrap(), 99);
        assert_eq!(norm("1800"), 1800);
        assert_eq!(norm(" 12.5 "), 12);
    }

    #[test]
    fn booleans_count_as_one_or_zero() {
        assert_eq!(normalize(Some(&Cell::Bool(true)), FIELD).unwrap(), 1);
        assert_eq!(normalize(Some(&Cell::Bool(false)), FIELD).unwrap(), 0);
    }

    #[test]
    fn negative_passes_through() {
        assert_eq!(normalize(Some(&Cell::Number(-50.0)), FIELD).unwrap(), -50);
        assert_eq!(norm("-7.9"), -7);
    }

    #[test]
    fn strips_currency_junk() {
        assert_eq!(norm("$1,250.00"), 1250);
        assert_eq!(norm("₡ 4 500"), 4500);
        assert_eq!(norm("350 c/u"), 350);
    }

    #[test]
    fn junk_without_digits_is_zero() {
        assert_eq!(norm("N/A"), 0);
        assert_eq!(norm(""), 0);
        assert_eq!(norm("inf"), 0);
    }

    #[test]
    fn unparseable_after_cleanup_is_zero() {
        assert_eq!(norm("1.2.3"), 0);
        assert_eq!(norm("."), 0);
    }

    #[test]
    fn out_of_range_fails() {
        let err = normalize(Some(&Cell::Number(1e30)), FIELD).unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { field: FIELD, .. }));
        assert!(normalize(Some(&Cell::Text("$99999999999999999999".into())), FIELD).is_err());
    }
}
