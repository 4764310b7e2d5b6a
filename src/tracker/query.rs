//! Workload queries over the normalized manuscript table.
//!
//! Every query is a read-only projection: it builds a polars predicate, runs
//! it against a clone of the table and returns the matching subset. Nulls
//! never satisfy a predicate, so a manuscript whose revision flag is unknown
//! is neither "original" nor "revised".

use super::types::{CountType, DaysStats, ManuscriptTable, epoch_days, field, str_values};
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

fn editor_is(editor: &str) -> Expr {
    col(field::EDITOR_NAME).eq(lit(editor))
}

fn is_revised() -> Expr {
    col(field::IS_REVISED).eq(lit(true))
}

fn not_revised() -> Expr {
    col(field::IS_REVISED).eq(lit(false))
}

fn is_pending() -> Expr {
    col(field::IS_PENDING).eq(lit(true))
}

fn not_pending() -> Expr {
    col(field::IS_PENDING).eq(lit(false))
}

/// Decided originals, plus every revised manuscript decided in or after `year`
/// whatever its pending state.
fn original_rule(editor: &str, year: i32) -> Expr {
    let decided_original = editor_is(editor)
        .and(not_pending())
        .and(not_revised())
        .and(col(field::FIRST_DECISION_YEAR).gt_eq(lit(year)));
    let decided_revised = editor_is(editor)
        .and(is_revised())
        .and(col(field::FIRST_DECISION_YEAR).gt_eq(lit(year)));
    decided_original.or(decided_revised)
}

fn revised_rule(editor: &str, year: i32) -> Expr {
    let awaiting_latest = editor_is(editor)
        .and(is_revised())
        .and(col(field::LATEST_DECISION_DATE).is_null())
        .and(col(field::FIRST_DECISION_YEAR).gt_eq(lit(year)));
    let concluded = editor_is(editor)
        .and(is_revised())
        .and(not_pending())
        .and(col(field::LATEST_DECISION_YEAR).gt_eq(lit(year)));
    awaiting_latest.or(concluded)
}

fn pending_rule(editor: &str, year: i32) -> Expr {
    let submitted_since = editor_is(editor)
        .and(is_pending())
        .and(col(field::SUBMISSION_YEAR).gt_eq(lit(year)));
    let straddling = editor_is(editor)
        .and(is_pending())
        .and(col(field::SUBMISSION_YEAR).lt(lit(year)))
        .and(col(field::LATEST_DECISION_YEAR).gt_eq(lit(year)));
    submitted_since.or(straddling)
}

/// Original rule, plus revisions first decided before `year` whose latest
/// decision falls in or after it. Earlier exports OR'd the original rule in a
/// second time; that branch adds nothing and is left out.
fn total_rule(editor: &str, year: i32) -> Expr {
    let revision_concluded = editor_is(editor)
        .and(is_revised())
        .and(not_pending())
        .and(col(field::FIRST_DECISION_YEAR).lt(lit(year)))
        .and(col(field::LATEST_DECISION_YEAR).gt_eq(lit(year)));
    original_rule(editor, year).or(revision_concluded)
}

/// Rounds to one decimal place from the exact binary value, ties to even:
/// 10.25 becomes 10.2, and 12.35 (stored just below) becomes 12.3.
fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

impl ManuscriptTable {
    fn filtered(&self, predicate: Expr) -> Result<Self> {
        let df = self.frame().clone().lazy().filter(predicate).collect()?;
        Ok(Self::from_frame(df))
    }

    /// Manuscripts originally submitted in `year`.
    ///
    /// `Total` keeps every one of them, `Original` only those known not to be
    /// revisions, and any other count type only known revisions.
    pub fn filter_by_year(&self, year: i32, count_type: CountType) -> Result<Self> {
        let in_year = col(field::SUBMISSION_YEAR).eq(lit(year));
        let predicate = match count_type {
            CountType::Total => in_year,
            CountType::Original => in_year.and(not_revised()),
            _ => in_year.and(is_revised()),
        };
        self.filtered(predicate)
    }

    /// Manuscripts whose original submission date lies in `[from, to]`.
    pub fn filter_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Self> {
        let days = || col(field::ORIGINAL_SUBMISSION_DATE).cast(DataType::Int32);
        let predicate = days()
            .gt_eq(lit(epoch_days(from)))
            .and(days().lt_eq(lit(epoch_days(to))));
        self.filtered(predicate)
    }

    /// Manuscripts `editor` handled in `year` under the rule for `count_type`.
    pub fn filter_by_editor_and_year(
        &self,
        editor: &str,
        year: i32,
        count_type: CountType,
    ) -> Result<Self> {
        let predicate = match count_type {
            CountType::Original => original_rule(editor, year),
            CountType::Revised => revised_rule(editor, year),
            CountType::Pending => pending_rule(editor, year),
            CountType::Total => total_rule(editor, year),
        };
        self.filtered(predicate)
    }

    pub fn count_by_editor_and_year(
        &self,
        editor: &str,
        year: i32,
        count_type: CountType,
    ) -> Result<usize> {
        Ok(self
            .filter_by_editor_and_year(editor, year, count_type)?
            .len())
    }

    /// Average, maximum and minimum time to handle, in days.
    ///
    /// Pending manuscripts are measured by days since their latest
    /// submission, everything else by days from original submission to first
    /// decision. The average is rounded to one decimal place.
    pub fn days_stats(&self, editor: &str, year: i32, count_type: CountType) -> Result<DaysStats> {
        let subset = self.filter_by_editor_and_year(editor, year, count_type)?;
        let column = match count_type {
            CountType::Pending => field::DAYS_SINCE_LATEST_SUBMISSION,
            _ => field::DAYS_TO_FIRST_DECISION,
        };

        let series = subset.frame().column(column)?.as_materialized_series();
        let days = series.i64()?;
        Ok(DaysStats {
            avg: days.mean().map(round_one_decimal),
            max: days.max(),
            min: days.min(),
        })
    }

    pub fn max_days(&self, editor: &str, year: i32, count_type: CountType) -> Result<Option<i64>> {
        Ok(self.days_stats(editor, year, count_type)?.max)
    }

    pub fn min_days(&self, editor: &str, year: i32, count_type: CountType) -> Result<Option<i64>> {
        Ok(self.days_stats(editor, year, count_type)?.min)
    }

    pub fn avg_days(&self, editor: &str, year: i32, count_type: CountType) -> Result<Option<f64>> {
        Ok(self.days_stats(editor, year, count_type)?.avg)
    }

    /// The most recently completed year: one less than the latest original
    /// submission year on record.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoSubmissionDates`] when no row has a submission date.
    pub fn report_year(&self) -> Result<i32> {
        let series = self
            .frame()
            .column(field::SUBMISSION_YEAR)?
            .as_materialized_series();
        let latest = series.i32()?.max().ok_or(ReportError::NoSubmissionDates)?;
        Ok(latest - 1)
    }

    /// Distinct editor names present in the table, sorted.
    pub fn editors_present(&self) -> Result<BTreeSet<String>> {
        Ok(str_values(self.frame(), field::EDITOR_NAME)?
            .into_iter()
            .flatten()
            .filter(|name| !name.is_empty())
            .collect())
    }
}
