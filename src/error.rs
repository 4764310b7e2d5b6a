//! Centralized error handling for editor-report.
//!
//! Every fallible library operation returns [`Result`], whose error type
//! [`ReportError`] separates data problems in the uploaded spreadsheet
//! (missing or malformed columns) from I/O and configuration failures:
//!
//! ```
//! use editor_report::error::ReportError;
//!
//! fn describe(err: &ReportError) -> String {
//!     match err {
//!         ReportError::MissingColumn(name) => format!("export is missing '{name}'"),
//!         ReportError::MalformedValue { column, row, .. } => {
//!             format!("bad value in '{column}' at row {row}")
//!         }
//!         other => other.to_string(),
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.with_context()` to any result whose error converts
//! into [`ReportError`]:
//!
//! ```no_run
//! use editor_report::error::ResultExt as _;
//! use std::path::Path;
//!
//! fn load(path: &Path) -> editor_report::error::Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
//! }
//! ```

use thiserror::Error;

/// Main error type for report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// I/O errors (opening the spreadsheet or config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be opened or has no usable worksheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Errors raised by the table engine
    #[error("Data processing error: {0}")]
    Data(#[from] polars::error::PolarsError),

    /// Configuration files are missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column required by the configuration or by a derived field is absent
    #[error("Required column '{0}' is missing from the uploaded report")]
    MissingColumn(String),

    /// A cell could not be interpreted (date or day-count text)
    #[error("Malformed value '{value}' in column '{column}' at row {row}")]
    MalformedValue {
        column: String,
        row: usize,
        value: String,
    },

    /// File extension is not a supported spreadsheet format
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    /// Editor is not part of the configured editor list
    #[error("Unknown editor '{0}'")]
    UnknownEditor(String),

    /// The table has no original submission date to derive a report year from
    #[error("No original submission dates found; cannot determine the report year")]
    NoSubmissionDates,

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<calamine::Error> for ReportError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

// The window shows errors as plain status text.
impl From<ReportError> for String {
    fn from(err: ReportError) -> Self {
        err.to_string()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ReportError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ReportError = e.into();
            ReportError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_missing_column_names_the_column() {
        let err = ReportError::MissingColumn("Editor Names".to_owned());
        assert_eq!(
            err.to_string(),
            "Required column 'Editor Names' is missing from the uploaded report"
        );
    }

    #[test]
    fn test_malformed_value_display() {
        let err = ReportError::MalformedValue {
            column: "First Decision Date".to_owned(),
            row: 3,
            value: "soon".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed value 'soon' in column 'First Decision Date' at row 3"
        );
    }

    #[test]
    fn test_error_conversion_to_string() {
        let s: String = ReportError::NoSubmissionDates.into();
        assert!(s.starts_with("No original submission dates"));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "report.xlsx",
        ));

        let result: Result<()> = result.with_context(|| "Failed to open spreadsheet".to_owned());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to open spreadsheet: I/O error: report.xlsx")
        );
    }
}
