//! Shared fixtures and query-engine tests for the tracker module.

#![expect(clippy::indexing_slicing)]

use super::types::source;
use super::{CountType, ManuscriptTable, normalize};
use crate::config::SchemaConfig;
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use polars::prelude::*;

/// One export row, as text cells. `None` is a blank cell.
#[derive(Clone, Copy)]
pub(crate) struct RawRow {
    pub id: Option<&'static str>,
    pub title: Option<&'static str>,
    pub status: Option<&'static str>,
    pub editor: Option<&'static str>,
    pub submitted: Option<&'static str>,
    pub first_decision: Option<&'static str>,
    pub latest_decision: Option<&'static str>,
    pub since_original: Option<&'static str>,
    pub since_latest: Option<&'static str>,
}

impl Default for RawRow {
    fn default() -> Self {
        Self {
            id: Some("TNSM-2022-0001"),
            title: Some("Intent-Based Slicing"),
            status: Some("Accept"),
            editor: Some("Smith"),
            submitted: Some("2022-01-10"),
            first_decision: Some("2022-02-09"),
            latest_decision: None,
            since_original: Some("400 days"),
            since_latest: None,
        }
    }
}

pub(crate) fn raw_frame(rows: &[RawRow]) -> DataFrame {
    let column = |name: &str, cell: fn(&RawRow) -> Option<&'static str>| {
        let values: Vec<Option<&str>> = rows.iter().map(cell).collect();
        Column::from(Series::new(name.into(), values))
    };

    DataFrame::new(vec![
        column(source::MANUSCRIPT_STATUS, |r| r.status),
        column(source::MANUSCRIPT_TITLE, |r| r.title),
        column(source::MANUSCRIPT_ID_LATEST, |r| r.id),
        column(source::EDITOR_NAMES, |r| r.editor),
        column(source::ORIGINAL_SUBMISSION_DATE, |r| r.submitted),
        column(source::FIRST_DECISION_DATE, |r| r.first_decision),
        column(source::LATEST_DECISION_DATE, |r| r.latest_decision),
        column(source::DAYS_SINCE_ORIGINAL_SUBMISSION, |r| r.since_original),
        column(source::DAYS_SINCE_LATEST_SUBMISSION, |r| r.since_latest),
    ])
    .expect("fixture columns have equal length")
}

pub(crate) fn config() -> SchemaConfig {
    SchemaConfig::new(
        source::FORMULA_COLUMNS
            .into_iter()
            .chain([source::DAYS_SINCE_LATEST_SUBMISSION]),
        [
            "Awaiting Reviewer Scores",
            "Awaiting AE Recommendation",
            "Under Review",
        ],
        ["Smith", "Jones"],
    )
}

pub(crate) fn table(rows: &[RawRow]) -> ManuscriptTable {
    normalize(&raw_frame(rows), &config()).expect("fixture normalizes")
}

fn ids(table: &ManuscriptTable) -> Result<Vec<String>> {
    Ok(table
        .records()?
        .into_iter()
        .filter_map(|r| r.manuscript_id_latest)
        .collect())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn test_single_decided_original_is_counted() -> Result<()> {
    let table = table(&[RawRow::default()]);

    let original = table.filter_by_editor_and_year("Smith", 2022, CountType::Original)?;
    assert_eq!(ids(&original)?, ["TNSM-2022-0001"]);
    assert_eq!(table.avg_days("Smith", 2022, CountType::Original)?, Some(30.0));
    assert_eq!(table.max_days("Smith", 2022, CountType::Original)?, Some(30));
    assert_eq!(table.min_days("Smith", 2022, CountType::Original)?, Some(30));
    Ok(())
}

#[test]
fn test_unknown_revision_flag_matches_neither_branch() -> Result<()> {
    let table = table(&[RawRow {
        id: None,
        ..RawRow::default()
    }]);

    assert_eq!(table.records()?[0].is_revised, None);
    assert_eq!(table.filter_by_year(2022, CountType::Original)?.len(), 0);
    assert_eq!(table.filter_by_year(2022, CountType::Revised)?.len(), 0);
    assert_eq!(table.filter_by_year(2022, CountType::Total)?.len(), 1);
    assert_eq!(
        table.count_by_editor_and_year("Smith", 2022, CountType::Original)?,
        0
    );
    Ok(())
}

#[test]
fn test_filter_by_year() -> Result<()> {
    let table = table(&[
        RawRow::default(),
        RawRow {
            id: Some("TNSM-2022-0002.R1"),
            ..RawRow::default()
        },
        RawRow {
            id: Some("TNSM-2021-0003"),
            submitted: Some("2021-12-31"),
            ..RawRow::default()
        },
    ]);

    assert_eq!(table.filter_by_year(2022, CountType::Total)?.len(), 2);
    assert_eq!(ids(&table.filter_by_year(2022, CountType::Original)?)?, ["TNSM-2022-0001"]);
    assert_eq!(ids(&table.filter_by_year(2022, CountType::Revised)?)?, ["TNSM-2022-0002.R1"]);
    // Any count type other than total/original selects revisions.
    assert_eq!(ids(&table.filter_by_year(2022, CountType::Pending)?)?, ["TNSM-2022-0002.R1"]);
    assert_eq!(table.filter_by_year(2021, CountType::Total)?.len(), 1);
    Ok(())
}

#[test]
fn test_filter_by_date_range_is_inclusive() -> Result<()> {
    let submitted = |id, day| RawRow {
        id: Some(id),
        submitted: Some(day),
        ..RawRow::default()
    };
    let table = table(&[
        submitted("before", "2021-12-31"),
        submitted("first-day", "2022-01-01"),
        submitted("last-day", "2022-06-30"),
        submitted("after", "2022-07-01"),
        RawRow {
            id: Some("undated"),
            submitted: None,
            ..RawRow::default()
        },
    ]);

    let window = table.filter_by_date_range(date(2022, 1, 1), date(2022, 6, 30))?;
    assert_eq!(ids(&window)?, ["first-day", "last-day"]);
    Ok(())
}

#[test]
fn test_pending_year_boundary() -> Result<()> {
    let pending = RawRow {
        status: Some("Awaiting Reviewer Scores"),
        first_decision: None,
        ..RawRow::default()
    };
    let table = table(&[
        RawRow {
            id: Some("submitted-in-year"),
            submitted: Some("2022-03-01"),
            since_latest: Some("10 days"),
            ..pending
        },
        RawRow {
            id: Some("straddles-year"),
            submitted: Some("2021-06-01"),
            first_decision: Some("2021-08-01"),
            latest_decision: Some("2022-01-15"),
            since_latest: Some("40 days"),
            ..pending
        },
        RawRow {
            id: Some("closed-last-year"),
            submitted: Some("2021-05-01"),
            first_decision: Some("2021-07-01"),
            latest_decision: Some("2021-12-01"),
            ..pending
        },
        RawRow {
            id: Some("no-latest-decision"),
            submitted: Some("2021-05-01"),
            ..pending
        },
    ]);

    let found = table.filter_by_editor_and_year("Smith", 2022, CountType::Pending)?;
    assert_eq!(ids(&found)?, ["submitted-in-year", "straddles-year"]);

    let stats = table.days_stats("Smith", 2022, CountType::Pending)?;
    assert_eq!(stats.avg, Some(25.0));
    assert_eq!(stats.max, Some(40));
    assert_eq!(stats.min, Some(10));
    Ok(())
}

/// Original and revised counts overlap, and total is not their sum.
#[test]
fn test_count_types_overlap() -> Result<()> {
    let table = table(&[
        RawRow {
            id: Some("decided-original"),
            latest_decision: Some("2022-02-09"),
            ..RawRow::default()
        },
        RawRow {
            id: Some("revision-in-review.R1"),
            status: Some("Awaiting Reviewer Scores"),
            submitted: Some("2021-10-01"),
            first_decision: Some("2022-01-05"),
            latest_decision: None,
            ..RawRow::default()
        },
        RawRow {
            id: Some("revision-concluded.R2"),
            status: Some("Accept"),
            submitted: Some("2021-03-01"),
            first_decision: Some("2021-05-01"),
            latest_decision: Some("2022-03-01"),
            ..RawRow::default()
        },
        RawRow {
            id: Some("revision-reopened.R1"),
            status: Some("Awaiting AE Recommendation"),
            submitted: Some("2021-01-15"),
            first_decision: Some("2021-02-01"),
            latest_decision: Some("2022-02-01"),
            ..RawRow::default()
        },
        RawRow {
            id: Some("other-editor"),
            editor: Some("Jones"),
            ..RawRow::default()
        },
    ]);

    let by = |ct| -> Result<Vec<String>> { ids(&table.filter_by_editor_and_year("Smith", 2022, ct)?) };

    assert_eq!(by(CountType::Original)?, ["decided-original", "revision-in-review.R1"]);
    assert_eq!(by(CountType::Revised)?, ["revision-in-review.R1", "revision-concluded.R2"]);
    assert_eq!(
        by(CountType::Total)?,
        ["decided-original", "revision-in-review.R1", "revision-concluded.R2"]
    );
    assert_eq!(by(CountType::Pending)?, ["revision-reopened.R1"]);

    let original = table.count_by_editor_and_year("Smith", 2022, CountType::Original)?;
    let revised = table.count_by_editor_and_year("Smith", 2022, CountType::Revised)?;
    let total = table.count_by_editor_and_year("Smith", 2022, CountType::Total)?;
    assert_eq!((original, revised, total), (2, 2, 3));
    Ok(())
}

#[test]
fn test_empty_selection_has_no_stats() -> Result<()> {
    let table = table(&[RawRow::default()]);

    assert_eq!(table.count_by_editor_and_year("Jones", 2022, CountType::Total)?, 0);
    let stats = table.days_stats("Jones", 2022, CountType::Original)?;
    assert_eq!(stats.avg, None);
    assert_eq!(stats.max, None);
    assert_eq!(stats.min, None);
    Ok(())
}

#[test]
fn test_queries_are_repeatable() -> Result<()> {
    let table = table(&[
        RawRow::default(),
        RawRow {
            id: Some("TNSM-2021-0009.R1"),
            ..RawRow::default()
        },
    ]);

    for ct in [CountType::Total, CountType::Original, CountType::Revised, CountType::Pending] {
        let first = table.filter_by_editor_and_year("Smith", 2022, ct)?.records()?;
        let second = table.filter_by_editor_and_year("Smith", 2022, ct)?.records()?;
        assert_eq!(first, second, "{ct}");
    }
    assert_eq!(table.len(), 2);
    Ok(())
}

#[test]
fn test_report_year_is_year_before_latest_submission() -> Result<()> {
    let table = table(&[
        RawRow::default(),
        RawRow {
            submitted: Some("2023-01-04"),
            ..RawRow::default()
        },
        RawRow {
            submitted: None,
            ..RawRow::default()
        },
    ]);
    assert_eq!(table.report_year()?, 2022);
    Ok(())
}

#[test]
fn test_report_year_needs_a_submission_date() {
    let table = table(&[RawRow {
        submitted: None,
        ..RawRow::default()
    }]);
    assert!(matches!(table.report_year(), Err(ReportError::NoSubmissionDates)));
}

#[test]
fn test_editors_present() -> Result<()> {
    let table = table(&[
        RawRow::default(),
        RawRow {
            editor: Some("Jones"),
            ..RawRow::default()
        },
        RawRow {
            editor: None,
            ..RawRow::default()
        },
    ]);

    let editors: Vec<String> = table.editors_present()?.into_iter().collect();
    assert_eq!(editors, ["Jones", "Smith"]);
    Ok(())
}

#[test]
fn test_average_tie_rounds_to_even() -> Result<()> {
    let decided_on = |id, first_decision| RawRow {
        id: Some(id),
        first_decision: Some(first_decision),
        ..RawRow::default()
    };
    // 10, 10, 10 and 11 days to first decision: the mean is exactly 10.25.
    let table = table(&[
        decided_on("TNSM-2022-0001", "2022-01-20"),
        decided_on("TNSM-2022-0002", "2022-01-20"),
        decided_on("TNSM-2022-0003", "2022-01-20"),
        decided_on("TNSM-2022-0004", "2022-01-21"),
    ]);

    let stats = table.days_stats("Smith", 2022, CountType::Original)?;
    assert_eq!(stats.avg, Some(10.2));
    assert_eq!(stats.max, Some(11));
    assert_eq!(stats.min, Some(10));
    Ok(())
}
