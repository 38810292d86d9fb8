//! Form session: binds one form to a draft or to an existing log.
//!
//! A draft-mode session follows the store's active draft. Edits mark the
//! draft as saving and arm a debounce; once the form has been quiet for the
//! configured delay the full values are committed to the drafts store.
//! Submitting validates every field and, in draft mode, promotes the draft
//! into a service log and discards it.
//!
//! Changing the start date always moves the end date to the following day,
//! even when the end date was edited by hand. Seeding the form counts as a
//! change when the seeded start date differs from the one bound before.

mod debounce;
pub mod validation;

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::dates;
use crate::model::{DraftSaveStatus, FormValues, ServiceLog, ServiceLogFields, ServiceType};
use crate::store::AppStore;

pub use debounce::Debouncer;
pub use validation::{Field, FieldErrors, validate};

/// Quiet period before an edit is committed to the drafts store.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// No draft is bound; edits are ignored.
    Disabled,
    /// Fields are bound and validation is active.
    Editing,
    /// A valid submit is being applied.
    Submitting,
}

/// Called with the validated fields when an edit-mode session submits.
pub type OnSubmit = Box<dyn FnMut(&mut AppStore, Uuid, ServiceLogFields)>;

enum FormMode {
    Draft,
    Edit { log_id: Uuid, on_submit: OnSubmit },
}

/// A single field edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    ProviderId(String),
    ServiceOrder(String),
    CarId(String),
    Odometer(Option<f64>),
    EngineHours(Option<f64>),
    StartDate(String),
    EndDate(String),
    Type(ServiceType),
    ServiceDescription(String),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            Self::ProviderId(_) => Field::ProviderId,
            Self::ServiceOrder(_) => Field::ServiceOrder,
            Self::CarId(_) => Field::CarId,
            Self::Odometer(_) => Field::Odometer,
            Self::EngineHours(_) => Field::EngineHours,
            Self::StartDate(_) => Field::StartDate,
            Self::EndDate(_) => Field::EndDate,
            Self::Type(_) => Field::Type,
            Self::ServiceDescription(_) => Field::ServiceDescription,
        }
    }

    /// Write the new value. Returns whether the stored value changed.
    fn apply(self, values: &mut FormValues) -> bool {
        fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
            let changed = *slot != value;
            *slot = value;
            changed
        }
        match self {
            Self::ProviderId(v) => set(&mut values.provider_id, v),
            Self::ServiceOrder(v) => set(&mut values.service_order, v),
            Self::CarId(v) => set(&mut values.car_id, v),
            Self::Odometer(v) => set(&mut values.odometer, v),
            Self::EngineHours(v) => set(&mut values.engine_hours, v),
            Self::StartDate(v) => set(&mut values.start_date, v),
            Self::EndDate(v) => set(&mut values.end_date, v),
            Self::Type(v) => set(&mut values.service_type, v),
            Self::ServiceDescription(v) => set(&mut values.service_description, v),
        }
    }
}

/// What a successful submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// A draft became a new service log and was discarded.
    Promoted { draft_id: Uuid, log_id: Uuid },
    /// The edit callback received the values for an existing log.
    Edited { log_id: Uuid },
}

/// Why a submit did not go through.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no draft is selected")]
    Disabled,

    #[error("{0}")]
    Invalid(FieldErrors),
}

/// One form bound to either the active draft or an existing log.
pub struct FormSession {
    mode: FormMode,
    state: FormState,
    bound_draft: Option<Uuid>,
    values: Option<FormValues>,
    errors: FieldErrors,
    autosave: Debouncer<(Uuid, FormValues)>,
}

impl FormSession {
    /// A session that follows the active draft, saving after `autosave_delay`.
    pub fn draft(autosave_delay: Duration) -> Self {
        Self {
            mode: FormMode::Draft,
            state: FormState::Disabled,
            bound_draft: None,
            values: None,
            errors: FieldErrors::default(),
            autosave: Debouncer::new(autosave_delay),
        }
    }

    /// A session editing an existing log. Nothing is auto-saved; the store
    /// change on submit is up to `on_submit`.
    pub fn edit(
        log: &ServiceLog,
        on_submit: impl FnMut(&mut AppStore, Uuid, ServiceLogFields) + 'static,
    ) -> Self {
        let mut values = FormValues::from(log);
        sync_end_date(&mut values);
        Self {
            mode: FormMode::Edit {
                log_id: log.id,
                on_submit: Box::new(on_submit),
            },
            state: FormState::Editing,
            bound_draft: None,
            values: Some(values),
            errors: FieldErrors::default(),
            autosave: Debouncer::new(Duration::ZERO),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> Option<&FormValues> {
        self.values.as_ref()
    }

    /// Messages from the last failed submit, kept current while editing.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn bound_draft(&self) -> Option<Uuid> {
        self.bound_draft
    }

    /// Rebind to the store's active draft if it changed.
    ///
    /// A new binding re-seeds every field from the draft's saved values and
    /// drops any save still pending for the previous draft. The seeded end
    /// date follows the start date unless the start date is unchanged from
    /// the previous binding. Seeding does not schedule a save.
    pub fn sync_active_draft(&mut self, store: &AppStore) {
        if !matches!(self.mode, FormMode::Draft) {
            return;
        }
        let active = store.drafts().active();
        if active.map(|d| d.id) == self.bound_draft {
            return;
        }

        if self.autosave.cancel() {
            tracing::debug!(draft = ?self.bound_draft, "discarded pending autosave on draft switch");
        }
        self.errors.clear();
        match active {
            Some(draft) => {
                let mut values = draft.form_values.clone();
                let previous_start = self.values.as_ref().map(|v| v.start_date.as_str());
                if previous_start != Some(values.start_date.as_str()) {
                    sync_end_date(&mut values);
                }
                self.bound_draft = Some(draft.id);
                self.values = Some(values);
                self.state = FormState::Editing;
            }
            None => {
                self.bound_draft = None;
                self.values = None;
                self.state = FormState::Disabled;
            }
        }
    }

    /// Apply one field edit.
    pub fn set_field(&mut self, update: FieldUpdate, store: &mut AppStore, now: Instant) {
        if self.state != FormState::Editing {
            return;
        }
        let Some(values) = self.values.as_mut() else {
            return;
        };

        let is_start = matches!(update, FieldUpdate::StartDate(_));
        if !update.apply(values) {
            return;
        }
        if is_start {
            sync_end_date(values);
        }
        if !self.errors.is_empty() {
            self.errors = validate(values).err().unwrap_or_default();
        }

        if let (FormMode::Draft, Some(id)) = (&self.mode, self.bound_draft) {
            store.set_draft_save_status(id, DraftSaveStatus::Saving);
            self.autosave.schedule((id, values.clone()), now);
        }
    }

    /// Commit a pending save now, without waiting for the quiet period.
    pub fn flush(&mut self, store: &mut AppStore) -> bool {
        match self.autosave.take() {
            Some((id, values)) => {
                commit(store, id, values);
                true
            }
            None => false,
        }
    }

    /// Validate and submit.
    ///
    /// On failure the session stays in [`FormState::Editing`] with its field
    /// errors set, and the store is untouched.
    pub fn submit(&mut self, store: &mut AppStore) -> Result<Submitted, SubmitError> {
        if self.state != FormState::Editing {
            return Err(SubmitError::Disabled);
        }
        let Some(values) = self.values.as_ref() else {
            return Err(SubmitError::Disabled);
        };

        let fields = match validate(values) {
            Ok(fields) => fields,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors.clear();
        self.state = FormState::Submitting;

        let submitted = match &mut self.mode {
            FormMode::Draft => {
                let Some(draft_id) = self.bound_draft.take() else {
                    self.state = FormState::Disabled;
                    return Err(SubmitError::Disabled);
                };
                self.autosave.cancel();
                let log_id = store.create_service_log(fields);
                store.delete_draft(draft_id);
                tracing::info!(%draft_id, %log_id, "promoted draft to service log");
                Submitted::Promoted { draft_id, log_id }
            }
            FormMode::Edit { log_id, on_submit } => {
                on_submit(store, *log_id, fields);
                Submitted::Edited { log_id: *log_id }
            }
        };

        self.values = None;
        self.state = FormState::Disabled;
        Ok(submitted)
    }
}

// Timer-driven surface for a long-lived front end. The CLI exits after one
// command and flushes instead.
#[allow(dead_code)]
impl FormSession {
    pub fn is_save_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Commit a pending save whose quiet period has passed.
    ///
    /// Returns whether anything was written.
    pub fn tick(&mut self, store: &mut AppStore, now: Instant) -> bool {
        match self.autosave.poll(now) {
            Some((id, values)) => {
                commit(store, id, values);
                true
            }
            None => false,
        }
    }

    /// Tear the session down. Any pending save is discarded.
    pub fn close(&mut self) {
        self.autosave.cancel();
        self.state = FormState::Disabled;
    }
}

fn commit(store: &mut AppStore, id: Uuid, values: FormValues) {
    store.update_draft_form_values(id, values);
    store.set_draft_save_status(id, DraftSaveStatus::Saved);
    tracing::debug!(draft = %id, "autosaved draft");
}

/// Move the end date to the day after the start date.
///
/// Leaves the end date alone while the start date does not parse.
fn sync_end_date(values: &mut FormValues) {
    match dates::add_days(&values.start_date, 1) {
        Ok(next) => values.end_date = next,
        Err(e) => tracing::debug!("skipping end date sync: {e}"),
    }
}
