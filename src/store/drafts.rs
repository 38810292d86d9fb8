//! Drafts section: in-progress forms and the active pointer.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Draft, DraftSaveStatus, FormValues};

/// State owned by the drafts section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftsState {
    pub items: BTreeMap<Uuid, Draft>,
    pub active_draft_id: Option<Uuid>,
}

/// Transitions of the drafts section.
#[derive(Debug, Clone)]
pub enum DraftAction {
    /// Insert a fresh draft and make it active.
    Create { id: Uuid, values: FormValues },
    SetActive(Uuid),
    UpdateFormValues { id: Uuid, values: FormValues },
    SetSaveStatus { id: Uuid, status: DraftSaveStatus },
    Delete(Uuid),
    ClearAll,
}

impl DraftsState {
    /// Apply one action. Returns whether the state changed.
    ///
    /// Actions naming an unknown draft are ignored.
    pub fn apply(&mut self, action: DraftAction, now: Timestamp) -> bool {
        match action {
            DraftAction::Create { id, values } => {
                self.items.insert(
                    id,
                    Draft {
                        id,
                        form_values: values,
                        save_status: DraftSaveStatus::Idle,
                        created_at: now,
                        updated_at: now,
                    },
                );
                self.active_draft_id = Some(id);
                true
            }
            DraftAction::SetActive(id) => {
                if !self.items.contains_key(&id) {
                    tracing::debug!(%id, "ignoring activation of unknown draft");
                    return false;
                }
                let changed = self.active_draft_id != Some(id);
                self.active_draft_id = Some(id);
                changed
            }
            DraftAction::UpdateFormValues { id, values } => {
                let Some(draft) = self.items.get_mut(&id) else {
                    tracing::debug!(%id, "ignoring update of unknown draft");
                    return false;
                };
                draft.form_values = values;
                draft.updated_at = now;
                true
            }
            DraftAction::SetSaveStatus { id, status } => {
                let Some(draft) = self.items.get_mut(&id) else {
                    return false;
                };
                let changed = draft.save_status != status;
                draft.save_status = status;
                changed
            }
            DraftAction::Delete(id) => {
                if self.items.remove(&id).is_none() {
                    tracing::debug!(%id, "ignoring delete of unknown draft");
                    return false;
                }
                if self.active_draft_id == Some(id) {
                    self.active_draft_id = self.most_recently_updated();
                }
                true
            }
            DraftAction::ClearAll => {
                let changed = !self.items.is_empty() || self.active_draft_id.is_some();
                self.items.clear();
                self.active_draft_id = None;
                changed
            }
        }
    }

    /// The active draft, if any.
    pub fn active(&self) -> Option<&Draft> {
        self.active_draft_id.and_then(|id| self.items.get(&id))
    }

    /// Drop an active pointer that no longer references a draft.
    ///
    /// Persisted state is edited outside the reducer only by hand, so this
    /// runs once after loading.
    pub fn normalize(&mut self) {
        if let Some(id) = self.active_draft_id
            && !self.items.contains_key(&id)
        {
            tracing::warn!(%id, "active draft missing from store, choosing another");
            self.active_draft_id = self.most_recently_updated();
        }
    }

    /// Most recently updated draft; ties go to the lowest id so the choice
    /// matches the head of the sorted draft list.
    fn most_recently_updated(&self) -> Option<Uuid> {
        self.items
            .values()
            .max_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| b.id.cmp(&a.id)))
            .map(|d| d.id)
    }
}
