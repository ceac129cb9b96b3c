use serde::Serialize;

/// Positional column names of the inventory sheet.
pub const COLUMNS: [&str; 5] = [
    "Nombre",
    "Cantidad",
    "Precio_Tienda",
    "Precio_Sugerido",
    "Ganancia",
];

// ── Input ──

/// A non-empty spreadsheet cell. Absent cells are `None` at the row level.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    /// Reads as "True"/"False" but counts as 1/0 where a number is expected.
    Bool(bool),
}

impl Cell {
    /// Text form handed to the parsers: whole numbers render without a fraction ("5", not "5.0").
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(t) => t.clone(),
            Cell::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// One data row of the sheet, bound positionally to [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the source sheet.
    pub line: usize,
    pub name: Option<Cell>,
    pub quantity: Option<Cell>,
    pub store_price: Option<Cell>,
    pub suggested_price: Option<Cell>,
    pub profit: Option<Cell>,
}

impl RawRow {
    /// Bind cells to columns by position. Missing trailing cells are absent, extras are dropped.
    pub fn from_cells(line: usize, cells: Vec<Option<Cell>>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = || cells.next().flatten();
        RawRow {
            line,
            name: next(),
            quantity: next(),
            store_price: next(),
            suggested_price: next(),
            profit: next(),
        }
    }
}

// ── Output ──

/// Import always emits `Other`; the rest are assigned by hand after import.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Necklaces,
    Earrings,
    Bracelets,
    Rings,
    Sets,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Sold,
    LowStock,
    Available,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Sold => "sold",
            Status::LowStock => "low-stock",
            Status::Available => "available",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub quantity: u64,
    pub store_price: i64,
    pub suggested_price: i64,
    pub profit_percentage: i64,
    pub category: Category,
    pub status: Status,
    pub notes: String,
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub row: usize,
    /// Raw name cell as text, unprocessed.
    pub name: Option<String>,
    pub error: String,
}
