//! Local persistence for store sections.
//!
//! Each section lives in its own JSON file under the storage root:
//!
//! ```text
//! <root>/
//!   drafts.json         # Drafts and the active draft id
//!   service-logs.json   # Service logs and the table's search/filters
//! ```
//!
//! A missing file is a valid empty section.

use std::{fs, io, path::PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{AppStore, DraftsState, Section, ServiceLogsState};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("corrupt section file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage for store sections.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.servicelog/data/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".servicelog").join("data"))
    }

    pub fn load_drafts(&self) -> Result<DraftsState> {
        let mut state: DraftsState = self.load(Section::Drafts)?;
        state.normalize();
        Ok(state)
    }

    pub fn load_service_logs(&self) -> Result<ServiceLogsState> {
        self.load(Section::ServiceLogs)
    }

    pub fn save_drafts(&self, state: &DraftsState) -> Result<()> {
        self.save(Section::Drafts, state)
    }

    pub fn save_service_logs(&self, state: &ServiceLogsState) -> Result<()> {
        self.save(Section::ServiceLogs, state)
    }

    /// Writes one section of `store` to disk.
    pub fn save_section(&self, store: &AppStore, section: Section) -> Result<()> {
        match section {
            Section::Drafts => self.save_drafts(store.drafts()),
            Section::ServiceLogs => self.save_service_logs(store.service_logs()),
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, section: Section) -> Result<T> {
        let path = self.section_path(section);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_str(&json).map_err(|source| StorageError::Json { path, source })
    }

    fn save<T: Serialize>(&self, section: Section, state: &T) -> Result<()> {
        let path = self.section_path(section);
        let json = serde_json::to_string_pretty(state).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved section");
        Ok(())
    }

    fn section_path(&self, section: Section) -> PathBuf {
        let name = match section {
            Section::Drafts => "drafts.json",
            Section::ServiceLogs => "service-logs.json",
        };
        self.root.join(name)
    }
}
