//! Manuscript-tracking table: ingestion, normalization and workload queries.

pub mod io;
pub mod normalize;
pub mod query;
pub mod types;

pub use io::{load_raw_table, load_table};
pub use normalize::normalize;
pub use types::{CountType, DaysStats, ManuscriptRecord, ManuscriptTable, NO_LATEST_SUBMISSION};

#[cfg(test)]
pub(crate) mod tests;
