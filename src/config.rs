//! Static lookup tables loaded once at startup.
//!
//! A configuration directory holds three JSON files:
//!
//! - `fields.json`: array of column names the export must contain
//! - `pending_status.json`: array of status strings that mean "still in review"
//! - `editors.json`: array of selectable editor names

use crate::error::{ReportError, Result, ResultExt as _};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const FIELDS_FILE: &str = "fields.json";
pub const PENDING_STATUS_FILE: &str = "pending_status.json";
pub const EDITORS_FILE: &str = "editors.json";

/// Environment variable that overrides the default configuration directory.
pub const CONFIG_DIR_ENV: &str = "EDITOR_REPORT_CONFIG_DIR";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Immutable schema configuration shared by the normalizer, query engine and shells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    columns: Vec<String>,
    pending_statuses: BTreeSet<String>,
    editors: Vec<String>,
}

impl SchemaConfig {
    pub fn new(
        columns: impl IntoIterator<Item = impl Into<String>>,
        pending_statuses: impl IntoIterator<Item = impl Into<String>>,
        editors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            pending_statuses: pending_statuses.into_iter().map(Into::into).collect(),
            editors: editors.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads the three lookup files from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if a file is missing or is not a JSON
    /// array of strings.
    pub fn load(dir: &Path) -> Result<Self> {
        let columns: Vec<String> = read_json_list(&dir.join(FIELDS_FILE))?;
        let pending: Vec<String> = read_json_list(&dir.join(PENDING_STATUS_FILE))?;
        let editors: Vec<String> = read_json_list(&dir.join(EDITORS_FILE))?;

        if columns.is_empty() {
            return Err(ReportError::Config(format!(
                "{} must list at least one column",
                dir.join(FIELDS_FILE).display()
            )));
        }

        log::debug!(
            "Loaded schema config from {}: {} columns, {} pending statuses, {} editors",
            dir.display(),
            columns.len(),
            pending.len(),
            editors.len()
        );

        Ok(Self::new(columns, pending, editors))
    }

    /// Required column names, in the order they should be listed to users.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn editors(&self) -> &[String] {
        &self.editors
    }

    pub fn is_pending_status(&self, status: &str) -> bool {
        self.pending_statuses.contains(status)
    }

    /// Checks that `editor` is one of the selectable editors.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownEditor`] for any other name.
    pub fn require_editor(&self, editor: &str) -> Result<()> {
        if self.editors.iter().any(|e| e == editor) {
            Ok(())
        } else {
            Err(ReportError::UnknownEditor(editor.to_owned()))
        }
    }
}

/// Resolves the configuration directory: explicit value, then the
/// environment override, then `./config`.
pub fn resolve_config_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
}

fn read_json_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let list = serde_json::from_str::<Vec<String>>(&content)
        .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))?;
    Ok(list)
}
