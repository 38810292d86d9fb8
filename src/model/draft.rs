//! Draft: an unsubmitted, auto-saved service log form.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DraftSaveStatus, FormValues};

/// An in-progress form owned by the drafts store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: Uuid,
    pub form_values: FormValues,
    pub save_status: DraftSaveStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
