use std::sync::LazyLock;

use regex::Regex;

use super::{parse_float, truncate, FieldError, Whole};
use crate::record::{Cell, COLUMNS};

// "0 - se vendio", "0 (se vendio)", "0 - (se vendio)"
static SOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)0\s*-\s*se\s+vendio|0\s*\(\s*se\s+vendio\s*\)|0\s*-\s*\(\s*se\s+vendio\s*\)").unwrap()
});
// "5 - quedan 1 (arcoiris)"
static QUEDAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*-\s*quedan\s+([0-9]+)\s*\(([^)]+)\)").unwrap());
// "2-(se vendieron)0"
static VENDIERON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*-\s*\(\s*se\s+vendieron\s*\)").unwrap());
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Split a quantity cell into (count, notes). First matching rule wins; the
/// structured patterns must run before the numeric and digit fallbacks.
pub fn parse(cell: Option<&Cell>) -> Result<(u64, String), FieldError> {
    let Some(cell) = cell else {
        return Ok((0, String::new()));
    };
    let raw = cell.as_text();
    let text = raw.trim();

    if SOLD_RE.is_match(text) {
        return Ok((0, "se vendio".to_string()));
    }

    if let Some(caps) = QUEDAN_RE.captures(text) {
        let qty = digits(&caps[1])?;
        return Ok((qty, format!("quedan {} ({})", &caps[2], &caps[3])));
    }

    if let Some(caps) = VENDIERON_RE.captures(text) {
        return Ok((digits(&caps[1])?, "se vendieron".to_string()));
    }

    if let Some(n) = parse_float(text) {
        match truncate(n) {
            Whole::Value(v) if v < 0 => return Err(FieldError::NegativeQuantity(v)),
            Whole::Value(v) => return Ok((v as u64, String::new())),
            Whole::OutOfRange => return Err(out_of_range(text)),
            // "inf"/"nan" are words here, not numbers
            Whole::NonFinite => {}
        }
    }

    match DIGITS_RE.find(text) {
        Some(m) => Ok((digits(m.as_str())?, text.to_string())),
        None => Ok((0, text.to_string())),
    }
}

fn digits(s: &str) -> Result<u64, FieldError> {
    s.parse::<u64>().map_err(|_| out_of_range(s))
}

fn out_of_range(value: &str) -> FieldError {
    FieldError::OutOfRange {
        field: COLUMNS[1],
        value: value.to_string(),
    }
}
