//! Persisted file artifacts: the last-request date stamp and the input
//! list of target employer IDs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Deserialize;

use crate::error::AppError;

const DATE_FORMAT: &str = "%d.%m.%y";

/// Date stamp of the last successful fetch, kept next to the config files.
pub struct LastRequestDate {
    path: PathBuf,
}

impl LastRequestDate {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save(&self) -> Result<(), AppError> {
        let stamp = Local::now().format(DATE_FORMAT).to_string();
        fs::write(&self.path, stamp)
            .map_err(|e| AppError::Internal(format!("Failed to save request date: {e}")))
    }

    /// The stored stamp, or an empty string when no fetch has happened yet.
    pub fn get(&self) -> String {
        fs::read_to_string(&self.path)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct EmployerIdEntry {
    id: i64,
}

/// Read the target employer IDs from a JSON file of `[{"id": 1740}, ...]`.
/// A missing file is a distinct not-found condition for the user.
pub fn employer_ids(path: &Path) -> Result<Vec<i64>, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "Employer ID file '{}' not found",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Internal(format!("Failed to read employer IDs: {e}")))?;
    let entries: Vec<EmployerIdEntry> = serde_json::from_str(&content)
        .map_err(|e| AppError::Internal(format!("Malformed employer ID file: {e}")))?;

    Ok(entries.into_iter().map(|e| e.id).collect())
}
