//! Derives the computed columns every query depends on.
//!
//! The raw table holds the export's cells as text. Normalization parses the
//! dates and day counts, classifies each manuscript as revised and/or pending,
//! and extracts decision years and months. Missing cells become nulls; cells
//! that cannot be interpreted are reported with their column and row.

use super::types::{
    ManuscriptTable, NO_LATEST_SUBMISSION, REVISION_MARKER, epoch_days, field, source,
};
use crate::config::SchemaConfig;
use crate::error::{ReportError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y", "%d-%B-%Y"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
];

/// Builds the normalized manuscript table from a raw export.
///
/// # Errors
///
/// - [`ReportError::MissingColumn`] if a configured column, or a column a
///   derivation reads, is absent
/// - [`ReportError::MalformedValue`] if a date or day count cannot be parsed
pub fn normalize(raw: &DataFrame, config: &SchemaConfig) -> Result<ManuscriptTable> {
    require_columns(raw, config)?;

    let ids = text_values(raw, source::MANUSCRIPT_ID_LATEST)?;
    let titles = text_values(raw, source::MANUSCRIPT_TITLE)?;
    let statuses = text_values(raw, source::MANUSCRIPT_STATUS)?;
    let editors = text_values(raw, source::EDITOR_NAMES)?;

    let submitted = parse_dates(raw, source::ORIGINAL_SUBMISSION_DATE)?;
    let first_decision = parse_dates(raw, source::FIRST_DECISION_DATE)?;
    let latest_decision = parse_dates(raw, source::LATEST_DECISION_DATE)?;

    let since_original = parse_day_counts(raw, source::DAYS_SINCE_ORIGINAL_SUBMISSION, None)?;
    let since_latest: Vec<i64> = if has_column(raw, source::DAYS_SINCE_LATEST_SUBMISSION) {
        parse_day_counts(raw, source::DAYS_SINCE_LATEST_SUBMISSION, Some("-1"))?
            .into_iter()
            .map(|days| days.unwrap_or(NO_LATEST_SUBMISSION))
            .collect()
    } else {
        log::warn!(
            "'{}' not in export; every manuscript gets {NO_LATEST_SUBMISSION}",
            source::DAYS_SINCE_LATEST_SUBMISSION
        );
        vec![NO_LATEST_SUBMISSION; raw.height()]
    };
    let to_decision = days_to_first_decision(raw, &submitted, &first_decision)?;

    let is_revised: Vec<Option<bool>> = ids
        .iter()
        .map(|id| id.as_deref().map(|id| id.contains(REVISION_MARKER)))
        .collect();
    let is_pending: Vec<Option<bool>> = statuses
        .iter()
        .map(|status| status.as_deref().map(|s| config.is_pending_status(s)))
        .collect();

    let unassigned = editors.iter().filter(|e| e.is_none()).count();
    if unassigned > 0 {
        log::debug!("{unassigned} manuscript(s) have no editor assigned");
    }
    let editors: Vec<String> = editors.into_iter().map(Option::unwrap_or_default).collect();

    let df = DataFrame::new(vec![
        Column::from(Series::new(field::MANUSCRIPT_ID_LATEST.into(), ids)),
        Column::from(Series::new(field::MANUSCRIPT_TITLE.into(), titles)),
        Column::from(Series::new(field::MANUSCRIPT_STATUS.into(), statuses)),
        Column::from(Series::new(field::EDITOR_NAME.into(), editors)),
        date_column(field::ORIGINAL_SUBMISSION_DATE, &submitted)?,
        date_column(field::FIRST_DECISION_DATE, &first_decision)?,
        date_column(field::LATEST_DECISION_DATE, &latest_decision)?,
        Column::from(Series::new(field::IS_REVISED.into(), is_revised)),
        Column::from(Series::new(field::IS_PENDING.into(), is_pending)),
        Column::from(Series::new(
            field::DAYS_SINCE_ORIGINAL_SUBMISSION.into(),
            since_original,
        )),
        Column::from(Series::new(
            field::DAYS_SINCE_LATEST_SUBMISSION.into(),
            since_latest,
        )),
        Column::from(Series::new(field::DAYS_TO_FIRST_DECISION.into(), to_decision)),
    ])?;

    let df = df
        .lazy()
        .with_columns([
            year_of(field::ORIGINAL_SUBMISSION_DATE).alias(field::SUBMISSION_YEAR),
            year_of(field::FIRST_DECISION_DATE).alias(field::FIRST_DECISION_YEAR),
            month_of(field::FIRST_DECISION_DATE).alias(field::FIRST_DECISION_MONTH),
            year_of(field::LATEST_DECISION_DATE).alias(field::LATEST_DECISION_YEAR),
            month_of(field::LATEST_DECISION_DATE).alias(field::LATEST_DECISION_MONTH),
        ])
        .collect()?;

    log::info!("Normalized {} manuscript record(s)", df.height());
    Ok(ManuscriptTable::from_frame(df))
}

fn year_of(date_column: &str) -> Expr {
    col(date_column).dt().year().cast(DataType::Int32)
}

fn month_of(date_column: &str) -> Expr {
    col(date_column).dt().month().cast(DataType::Int32)
}

fn has_column(raw: &DataFrame, name: &str) -> bool {
    raw.get_column_index(name).is_some()
}

fn require_columns(raw: &DataFrame, config: &SchemaConfig) -> Result<()> {
    let required = config
        .columns()
        .iter()
        .map(String::as_str)
        .chain(source::FORMULA_COLUMNS);

    for name in required {
        if !has_column(raw, name) {
            return Err(ReportError::MissingColumn(name.to_owned()));
        }
    }
    Ok(())
}

/// Cell text with surrounding whitespace removed; blank cells become `None`.
fn text_values(raw: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if !has_column(raw, name) {
        return Err(ReportError::MissingColumn(name.to_owned()));
    }
    let series = raw
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned))
        .collect())
}

/// Spreadsheet row of the `index`-th data row; the header is row 1.
fn sheet_row(index: usize) -> usize {
    index + 2
}

fn parse_dates(raw: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    text_values(raw, name)?
        .into_iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            None => Ok(None),
            Some(text) => parse_date(&text)
                .map(Some)
                .ok_or_else(|| ReportError::MalformedValue {
                    column: name.to_owned(),
                    row: sheet_row(i),
                    value: text,
                }),
        })
        .collect()
}

/// Parses a date cell; a time-of-day component is accepted and dropped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parses `"<integer> <unit text>"` cells. `missing` substitutes for blank
/// cells before parsing.
fn parse_day_counts(
    raw: &DataFrame,
    name: &str,
    missing: Option<&str>,
) -> Result<Vec<Option<i64>>> {
    text_values(raw, name)?
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            let Some(text) = cell.or_else(|| missing.map(str::to_owned)) else {
                return Ok(None);
            };
            parse_day_count(&text)
                .map(Some)
                .ok_or_else(|| ReportError::MalformedValue {
                    column: name.to_owned(),
                    row: sheet_row(i),
                    value: text,
                })
        })
        .collect()
}

/// Leading integer of a day-count cell: `"45 days"` → 45, `"12"` → 12.
/// Whole spreadsheet numbers such as `"30.0"` are accepted too.
pub fn parse_day_count(text: &str) -> Option<i64> {
    let text = text.trim();
    let lead = text.split_once(' ').map_or(text, |(lead, _)| lead);

    lead.parse::<i64>().ok().or_else(|| {
        lead.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Days from original submission to first decision, read from the export
/// when it carries the column and derived from the two dates otherwise.
/// Always null while no first decision exists.
fn days_to_first_decision(
    raw: &DataFrame,
    submitted: &[Option<NaiveDate>],
    first_decision: &[Option<NaiveDate>],
) -> Result<Vec<Option<i64>>> {
    if has_column(raw, source::DAYS_TO_FIRST_DECISION) {
        let days = parse_day_counts(raw, source::DAYS_TO_FIRST_DECISION, None)?;
        return Ok(days
            .into_iter()
            .zip(first_decision)
            .map(|(days, decided)| decided.and(days))
            .collect());
    }

    Ok(submitted
        .iter()
        .zip(first_decision)
        .map(|(submitted, decided)| match (submitted, decided) {
            (Some(s), Some(d)) => Some(d.signed_duration_since(*s).num_days()),
            _ => None,
        })
        .collect())
}

fn date_column(name: &str, dates: &[Option<NaiveDate>]) -> Result<Column> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(epoch_days)).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(Column::from(series))
}
