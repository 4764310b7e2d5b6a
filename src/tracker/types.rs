use crate::error::{ReportError, Result};
use chrono::{Datelike as _, NaiveDate};
use polars::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Column headers as they appear in the manuscript-tracking export.
pub mod source {
    pub const MANUSCRIPT_STATUS: &str = "Manuscript Status";
    pub const MANUSCRIPT_TITLE: &str = "Manuscript Title";
    pub const MANUSCRIPT_ID_LATEST: &str = "Manuscript ID - Latest";
    pub const EDITOR_NAMES: &str = "Editor Names";
    pub const ORIGINAL_SUBMISSION_DATE: &str = "Original Submission Date";
    pub const FIRST_DECISION_DATE: &str = "First Decision Date";
    pub const LATEST_DECISION_DATE: &str = "Latest Decision Date";
    pub const DAYS_SINCE_ORIGINAL_SUBMISSION: &str = "# Days Since Original Submission";
    pub const DAYS_SINCE_LATEST_SUBMISSION: &str = "# Days Since Latest Submission";
    pub const DAYS_TO_FIRST_DECISION: &str =
        "# Days Between Original Submission & Original Decision";

    /// Columns read by a derivation; the export cannot be normalized without them.
    pub const FORMULA_COLUMNS: [&str; 8] = [
        MANUSCRIPT_STATUS,
        MANUSCRIPT_TITLE,
        MANUSCRIPT_ID_LATEST,
        EDITOR_NAMES,
        ORIGINAL_SUBMISSION_DATE,
        FIRST_DECISION_DATE,
        LATEST_DECISION_DATE,
        DAYS_SINCE_ORIGINAL_SUBMISSION,
    ];
}

/// Column names of the normalized table.
pub mod field {
    pub const MANUSCRIPT_ID_LATEST: &str = "manuscript_id_latest";
    pub const MANUSCRIPT_TITLE: &str = "manuscript_title";
    pub const MANUSCRIPT_STATUS: &str = "manuscript_status";
    pub const EDITOR_NAME: &str = "editor_name";
    pub const ORIGINAL_SUBMISSION_DATE: &str = "original_submission_date";
    pub const FIRST_DECISION_DATE: &str = "first_decision_date";
    pub const LATEST_DECISION_DATE: &str = "latest_decision_date";
    pub const SUBMISSION_YEAR: &str = "submission_year";
    pub const FIRST_DECISION_YEAR: &str = "first_decision_year";
    pub const FIRST_DECISION_MONTH: &str = "first_decision_month";
    pub const LATEST_DECISION_YEAR: &str = "latest_decision_year";
    pub const LATEST_DECISION_MONTH: &str = "latest_decision_month";
    pub const IS_REVISED: &str = "is_revised";
    pub const IS_PENDING: &str = "is_pending";
    pub const DAYS_SINCE_ORIGINAL_SUBMISSION: &str = "days_since_original_submission";
    pub const DAYS_SINCE_LATEST_SUBMISSION: &str = "days_since_latest_submission";
    pub const DAYS_TO_FIRST_DECISION: &str = "days_between_original_submission_and_decision";
}

/// Substring of the latest manuscript ID that marks a revised submission.
pub const REVISION_MARKER: &str = ".R";

/// Value of `days_since_latest_submission` when no latest submission is recorded.
pub const NO_LATEST_SUBMISSION: i64 = -1;

/// Selects which filter rule a workload query applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CountType {
    #[default]
    Total,
    Original,
    Revised,
    Pending,
}

impl CountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Original => "original",
            Self::Revised => "revised",
            Self::Pending => "pending",
        }
    }

    /// Capitalized name used at the start of report lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Original => "Original",
            Self::Revised => "Revised",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for CountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "total" => Ok(Self::Total),
            "original" => Ok(Self::Original),
            "revised" => Ok(Self::Revised),
            "pending" => Ok(Self::Pending),
            other => Err(ReportError::Other(format!(
                "Unknown count type '{other}' (expected total, original, revised or pending)"
            ))),
        }
    }
}

/// One normalized manuscript row. Every derived field is optional so that
/// "absent" stays distinct from `false` or zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManuscriptRecord {
    pub manuscript_id_latest: Option<String>,
    pub manuscript_title: Option<String>,
    pub manuscript_status: Option<String>,
    pub editor_name: String,
    pub original_submission_date: Option<NaiveDate>,
    pub first_decision_date: Option<NaiveDate>,
    pub latest_decision_date: Option<NaiveDate>,
    pub submission_year: Option<i32>,
    pub first_decision_year: Option<i32>,
    pub first_decision_month: Option<i32>,
    pub latest_decision_year: Option<i32>,
    pub latest_decision_month: Option<i32>,
    pub is_revised: Option<bool>,
    pub is_pending: Option<bool>,
    pub days_since_original_submission: Option<i64>,
    pub days_since_latest_submission: i64,
    pub days_between_original_submission_and_decision: Option<i64>,
}

/// Time-to-handle statistics in days; `None` means no data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DaysStats {
    pub avg: Option<f64>,
    pub max: Option<i64>,
    pub min: Option<i64>,
}

/// The normalized manuscript table. Immutable once built; every query
/// returns a new, filtered table.
#[derive(Debug, Clone)]
pub struct ManuscriptTable {
    df: DataFrame,
}

impl ManuscriptTable {
    pub(crate) fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Materializes the rows as typed records, in table order.
    pub fn records(&self) -> Result<Vec<ManuscriptRecord>> {
        let df = &self.df;
        let ids = str_values(df, field::MANUSCRIPT_ID_LATEST)?;
        let titles = str_values(df, field::MANUSCRIPT_TITLE)?;
        let statuses = str_values(df, field::MANUSCRIPT_STATUS)?;
        let editors = str_values(df, field::EDITOR_NAME)?;
        let submitted = date_values(df, field::ORIGINAL_SUBMISSION_DATE)?;
        let first = date_values(df, field::FIRST_DECISION_DATE)?;
        let latest = date_values(df, field::LATEST_DECISION_DATE)?;
        let submission_years = i32_values(df, field::SUBMISSION_YEAR)?;
        let first_years = i32_values(df, field::FIRST_DECISION_YEAR)?;
        let first_months = i32_values(df, field::FIRST_DECISION_MONTH)?;
        let latest_years = i32_values(df, field::LATEST_DECISION_YEAR)?;
        let latest_months = i32_values(df, field::LATEST_DECISION_MONTH)?;
        let revised = bool_values(df, field::IS_REVISED)?;
        let pending = bool_values(df, field::IS_PENDING)?;
        let since_original = i64_values(df, field::DAYS_SINCE_ORIGINAL_SUBMISSION)?;
        let since_latest = i64_values(df, field::DAYS_SINCE_LATEST_SUBMISSION)?;
        let to_decision = i64_values(df, field::DAYS_TO_FIRST_DECISION)?;

        let records = (0..df.height())
            .map(|i| ManuscriptRecord {
                manuscript_id_latest: cell(&ids, i),
                manuscript_title: cell(&titles, i),
                manuscript_status: cell(&statuses, i),
                editor_name: cell(&editors, i).unwrap_or_default(),
                original_submission_date: cell(&submitted, i),
                first_decision_date: cell(&first, i),
                latest_decision_date: cell(&latest, i),
                submission_year: cell(&submission_years, i),
                first_decision_year: cell(&first_years, i),
                first_decision_month: cell(&first_months, i),
                latest_decision_year: cell(&latest_years, i),
                latest_decision_month: cell(&latest_months, i),
                is_revised: cell(&revised, i),
                is_pending: cell(&pending, i),
                days_since_original_submission: cell(&since_original, i),
                days_since_latest_submission: cell(&since_latest, i)
                    .unwrap_or(NO_LATEST_SUBMISSION),
                days_between_original_submission_and_decision: cell(&to_decision, i),
            })
            .collect();

        Ok(records)
    }
}

fn cell<T: Clone>(values: &[Option<T>], row: usize) -> Option<T> {
    values.get(row).cloned().flatten()
}

// Day number of 1970-01-01 counted from 0001-01-01 as day 1.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, the physical representation of a date column.
pub(crate) fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

pub(crate) fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

fn i32_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series.i32()?.into_iter().collect())
}

fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series.i64()?.into_iter().collect())
}

fn bool_values(df: &DataFrame, name: &str) -> Result<Vec<Option<bool>>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series.bool()?.into_iter().collect())
}

fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let days = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(date_from_epoch_days))
        .collect())
}
