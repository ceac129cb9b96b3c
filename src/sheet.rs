use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

use crate::record::{Cell, RawRow};

type Grid = Vec<Vec<Option<Cell>>>;

/// Read the inventory sheet, drop the first `skip_rows` presentation rows and
/// bind the rest to the fixed columns. Row order is preserved.
pub fn read_rows(path: &Path, sheet: Option<&str>, skip_rows: usize) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let grid = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_csv(file).with_context(|| format!("Failed to read CSV {}", path.display()))?
        }
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, sheet)?,
        _ => bail!("Unsupported input format: {}", path.display()),
    };

    info!("Read {} physical rows from {}", grid.len(), path.display());
    Ok(bind_rows(grid, skip_rows))
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("Workbook has no sheets: {}", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    // The range starts at the first used cell; pad back to A1 so positions stay physical.
    let (row0, col0) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Grid = vec![Vec::new(); row0];
    for row in range.rows() {
        let mut cells = vec![None; col0];
        cells.extend(row.iter().map(data_to_cell));
        grid.push(cells);
    }
    Ok(grid)
}

fn read_csv<R: Read>(reader: R) -> Result<Grid> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid: Grid = Vec::new();
    for record in rdr.records() {
        let record = record?;
        // Blank lines produce no record; pad so grid index tracks the physical line.
        let line = record.position().map(|p| p.line() as usize).unwrap_or(grid.len() + 1);
        while grid.len() + 1 < line {
            grid.push(Vec::new());
        }
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(Cell::Text(field.to_string()))
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

fn bind_rows(grid: Grid, skip_rows: usize) -> Vec<RawRow> {
    grid.into_iter()
        .enumerate()
        .skip(skip_rows)
        .map(|(i, cells)| RawRow::from_cells(i + 1, cells))
        .collect()
}

fn data_to_cell(data: &Data) -> Option<Cell> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::Bool(b) => Some(Cell::Bool(*b)),
        Data::DateTime(dt) => Some(Cell::Text(match dt.as_datetime() {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt),
        })),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
    }
}
