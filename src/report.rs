//! Plain-text rendering of editor performance reports.
//!
//! Nothing here decides which manuscripts count; every number comes from the
//! queries on [`ManuscriptTable`].

use crate::config::SchemaConfig;
use crate::error::Result;
use crate::tracker::{CountType, ManuscriptRecord, ManuscriptTable};
use chrono::NaiveDate;

/// Formats an optional statistic, or returns "—" when there is no data.
fn fmt_opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "—".to_owned(), |x| x.to_string())
}

fn fmt_avg(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.1}"),
        _ => "—".to_owned(),
    }
}

/// Count of manuscripts handled, followed by a time-to-handle line when the
/// count is non-zero.
pub fn format_report_line(
    table: &ManuscriptTable,
    editor: &str,
    year: i32,
    count_type: CountType,
) -> Result<String> {
    let count = table.count_by_editor_and_year(editor, year, count_type)?;
    let mut line = format!(
        "{} manuscript(s) handled in {year}: {count}\n",
        count_type.label()
    );

    if count > 0 {
        let stats = table.days_stats(editor, year, count_type)?;
        line.push_str(&format!(
            "- Time to handle (in days): {} in average, maximum of {}, minimum of {}\n",
            fmt_avg(stats.avg),
            fmt_opt(stats.max),
            fmt_opt(stats.min)
        ));
    }

    Ok(line)
}

fn pending_line(record: &ManuscriptRecord) -> String {
    format!(
        "  - '{}', {}, in review for {} day(s) with status '{}'",
        record.manuscript_title.as_deref().unwrap_or("—"),
        record.manuscript_id_latest.as_deref().unwrap_or("—"),
        record.days_since_latest_submission,
        record.manuscript_status.as_deref().unwrap_or("—"),
    )
}

/// One bullet per pending manuscript, or an empty string when none are pending.
pub fn format_pending_list(table: &ManuscriptTable, editor: &str, year: i32) -> Result<String> {
    let pending = table
        .filter_by_editor_and_year(editor, year, CountType::Pending)?
        .records()?;

    if pending.is_empty() {
        return Ok(String::new());
    }

    let lines: Vec<String> = pending.iter().map(pending_line).collect();
    Ok(format!(
        "- List of pending manuscripts:\n{}\n",
        lines.join("\n")
    ))
}

/// The complete report for one editor in `year`.
pub fn format_editor_report(table: &ManuscriptTable, editor: &str, year: i32) -> Result<String> {
    let total = table.count_by_editor_and_year(editor, year, CountType::Total)?;

    let mut report = format!("{year} Performance Report - {editor}\n");
    report.push_str(&format!("Manuscript(s) handled in {year}: {total}\n"));
    for count_type in [CountType::Original, CountType::Revised, CountType::Pending] {
        report.push('\n');
        report.push_str(&format_report_line(table, editor, year, count_type)?);
    }

    let pending = format_pending_list(table, editor, year)?;
    if !pending.is_empty() {
        report.push('\n');
        report.push_str(&pending);
    }

    Ok(report)
}

/// Shown instead of a report while no spreadsheet is loaded.
pub fn format_instructions(columns: &[String]) -> String {
    let bullets: Vec<String> = columns.iter().map(|c| format!("* {c}")).collect();
    format!(
        "No info available yet (load a report spreadsheet to begin)\n\n\
         Be sure to include the following fields when exporting the report:\n\n{}\n",
        bullets.join("\n")
    )
}

/// Submissions received in `year`, split into originals and revisions.
pub fn format_submission_summary(table: &ManuscriptTable, year: i32) -> Result<String> {
    let total = table.filter_by_year(year, CountType::Total)?.len();
    let original = table.filter_by_year(year, CountType::Original)?.len();
    let revised = table.filter_by_year(year, CountType::Revised)?.len();
    Ok(format!(
        "Submissions in {year}: {total} ({original} original, {revised} revised)\n"
    ))
}

pub fn format_date_range_summary(
    table: &ManuscriptTable,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<String> {
    let count = table.filter_by_date_range(from, to)?.len();
    Ok(format!("Submissions between {from} and {to}: {count}\n"))
}

/// Text for the current view: instructions without a table, otherwise the
/// editor's report for `year` (default: the table's report year).
///
/// # Errors
///
/// Fails for an editor outside the configured list, or when no report year
/// can be derived.
pub fn render(
    config: &SchemaConfig,
    table: Option<&ManuscriptTable>,
    editor: &str,
    year: Option<i32>,
) -> Result<String> {
    let Some(table) = table else {
        return Ok(format_instructions(config.columns()));
    };

    config.require_editor(editor)?;
    let year = match year {
        Some(year) => year,
        None => table.report_year()?,
    };
    log::debug!("Rendering {year} report for {editor}");
    format_editor_report(table, editor, year)
}
