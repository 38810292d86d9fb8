//! JSON export of the filtered log view.

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Zoned;
use jiff::tz::TimeZone;

use crate::dates;
use crate::model::ServiceLog;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Default export file name for the given `YYYY-MM-DD` date.
pub fn file_name(date: &str) -> String {
    format!("service-logs-{date}.json")
}

/// Default export file name at `now`, dated in UTC.
pub fn default_file_name(now: &Zoned) -> String {
    file_name(&dates::today(&now.with_time_zone(TimeZone::UTC)))
}

/// Pretty-printed JSON array using the service log field names.
pub fn to_json(logs: &[ServiceLog]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(logs)?)
}

/// Write `logs` to `path`, returning how many were written.
pub fn write(logs: &[ServiceLog], path: &Path) -> Result<usize, ExportError> {
    let json = to_json(logs)?;
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(count = logs.len(), path = %path.display(), "exported service logs");
    Ok(logs.len())
}
