use super::normalize::normalize;
use super::types::ManuscriptTable;
use crate::config::SchemaConfig;
use crate::error::{ReportError, Result};
use calamine::{Data, Reader as _, open_workbook_auto};
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use std::path::Path;

/// Loads an export and normalizes it in one step.
///
/// # Errors
///
/// Fails if the file cannot be read, or if normalization rejects its columns
/// or cells.
pub fn load_table(path: &Path, config: &SchemaConfig) -> Result<ManuscriptTable> {
    let raw = load_raw_table(path)?;
    log::info!(
        "Loaded {} row(s), {} column(s) from {}",
        raw.height(),
        raw.width(),
        path.display()
    );
    normalize(&raw, config)
}

/// Reads the export's first sheet into a table of text cells, header row first.
///
/// # Errors
///
/// Returns [`ReportError::UnsupportedFile`] for an unknown extension.
pub fn load_raw_table(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        _ => Err(ReportError::UnsupportedFile(format!(
            "{} (expected .xlsx, .xls, .ods or .csv)",
            path.display()
        ))),
    }
}

fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    // Schema inference off: every column stays text for the normalizer.
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;
    Ok(df)
}

fn load_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReportError::Spreadsheet(format!("{} has no worksheets", path.display())))?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| ReportError::Spreadsheet(format!("worksheet '{sheet}' is empty")))?
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("column_{}", i + 1)))
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
    for row in rows {
        let values: Vec<Option<String>> = (0..header.len())
            .map(|i| row.get(i).and_then(cell_text))
            .collect();
        // Trailing formatting rows come through as blank lines.
        if values.iter().all(Option::is_none) {
            continue;
        }
        for (column, value) in cells.iter_mut().zip(values) {
            column.push(value);
        }
    }

    let columns = header
        .iter()
        .zip(cells)
        .map(|(name, values)| Column::from(Series::new(name.as_str().into(), values)))
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Data::Int(n) => Some(n.to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => excel_serial_date(dt.as_f64()).map(|d| d.format("%Y-%m-%d").to_string()),
    }
}

/// Calendar date of an Excel serial day number (1900 date system).
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
