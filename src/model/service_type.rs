//! Closed enumerations shared across the store, the form, and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a service visit came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Scheduled maintenance.
    Planned,

    /// An unscheduled visit that was not an emergency.
    Unplanned,

    /// Breakdown or roadside repair.
    Emergency,
}

impl ServiceType {
    pub const ALL: [Self; 3] = [Self::Planned, Self::Unplanned, Self::Emergency];

    /// The serialized name, also the text the search filter matches against.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Unplanned => "unplanned",
            Self::Emergency => "emergency",
        }
    }

    /// Title-cased label for table output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Unplanned => "Unplanned",
            Self::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Auto-save feedback for a single draft. UI state, not domain data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSaveStatus {
    /// Nothing has been edited since the draft was created or loaded.
    #[default]
    Idle,

    /// An edit is waiting for the debounce window to close.
    Saving,

    /// The latest edit has been committed to the drafts store.
    Saved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_type_serializes_lowercase() {
        let json = serde_json::to_string(&ServiceType::Emergency).unwrap();
        assert_eq!(json, "\"emergency\"");

        let parsed: ServiceType = serde_json::from_str("\"unplanned\"").unwrap();
        assert_eq!(parsed, ServiceType::Unplanned);
    }

    #[test]
    fn service_type_rejects_unknown_names() {
        assert!(serde_json::from_str::<ServiceType>("\"routine\"").is_err());
    }

    #[test]
    fn labels_match_serialized_names() {
        for ty in ServiceType::ALL {
            assert_eq!(ty.label().to_lowercase(), ty.as_str());
        }
    }
}
