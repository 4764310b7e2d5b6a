//! # editor-report
//!
//! Turns a manuscript-tracking spreadsheet export into per-editor workload
//! reports: how many original, revised and pending manuscripts an associate
//! editor handled in a year, and how long they took.
//!
//! ## Quick Start
//!
//! ```no_run
//! use editor_report::config::SchemaConfig;
//! use editor_report::report;
//! use editor_report::tracker::load_table;
//! use std::path::Path;
//!
//! # fn example() -> editor_report::error::Result<()> {
//! let config = SchemaConfig::load(Path::new("config"))?;
//! let table = load_table(Path::new("export.xlsx"), &config)?;
//!
//! let year = table.report_year()?;
//! println!("{}", report::format_editor_report(&table, "Jane Smith", year)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: required columns, pending statuses and editor list
//! - [`tracker`]: spreadsheet loading, normalization and workload queries
//! - [`report`]: plain-text report rendering
//! - [`gui`]: the desktop window
//! - [`error`]: error type and context helpers
//!
//! ## Null Semantics
//!
//! Derived fields are nullable. A manuscript without an ID has an unknown
//! revision flag, and one without a status has an unknown pending flag;
//! unknown flags match neither the `true` nor the `false` side of a filter.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod gui;
pub mod report;
pub mod tracker;
