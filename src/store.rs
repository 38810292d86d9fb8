//! Application state container.
//!
//! [`AppStore`] owns both store sections and is the only way to change them.
//! Every dispatch runs the section's reducer synchronously, bumps that
//! section's revision when something changed, and then notifies observers
//! before returning.

pub mod drafts;
pub mod service_logs;

use jiff::Zoned;
use uuid::Uuid;

use crate::dates;
use crate::model::{DraftSaveStatus, FormValues, ServiceLogFields, ServiceType};

pub use drafts::{DraftAction, DraftsState};
pub use service_logs::{Criteria, DateRange, ServiceLogAction, ServiceLogsState};

/// Source of the current time, injected so tests can pin it.
pub trait Clock {
    fn now(&self) -> Zoned;
}

/// The system clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// An independently persisted part of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Drafts,
    ServiceLogs,
}

/// Any store transition.
#[derive(Debug, Clone)]
pub enum Action {
    Drafts(DraftAction),
    ServiceLogs(ServiceLogAction),
}

impl Action {
    pub fn section(&self) -> Section {
        match self {
            Self::Drafts(_) => Section::Drafts,
            Self::ServiceLogs(_) => Section::ServiceLogs,
        }
    }
}

type Observer = Box<dyn FnMut(Section)>;

/// Owns the drafts and service logs sections.
pub struct AppStore {
    drafts: DraftsState,
    service_logs: ServiceLogsState,
    drafts_revision: u64,
    service_logs_revision: u64,
    clock: Box<dyn Clock>,
    observers: Vec<Observer>,
}

impl AppStore {
    pub fn new(drafts: DraftsState, service_logs: ServiceLogsState, clock: Box<dyn Clock>) -> Self {
        Self {
            drafts,
            service_logs,
            drafts_revision: 0,
            service_logs_revision: 0,
            clock,
            observers: Vec::new(),
        }
    }

    pub fn drafts(&self) -> &DraftsState {
        &self.drafts
    }

    pub fn service_logs(&self) -> &ServiceLogsState {
        &self.service_logs
    }

    /// Changes to a section so far. Selectors memoize on this.
    pub fn revision(&self, section: Section) -> u64 {
        match section {
            Section::Drafts => self.drafts_revision,
            Section::ServiceLogs => self.service_logs_revision,
        }
    }

    pub fn now(&self) -> Zoned {
        self.clock.now()
    }

    /// Register a callback run after each dispatch that changed a section.
    pub fn subscribe(&mut self, observer: impl FnMut(Section) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Run an action through its section's reducer.
    ///
    /// Returns whether the section changed. Observers only hear about
    /// changes; an action naming an unknown id is a silent no-op.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let section = action.section();
        let now = self.clock.now().timestamp();
        tracing::trace!(?action, "dispatch");

        let changed = match action {
            Action::Drafts(a) => self.drafts.apply(a, now),
            Action::ServiceLogs(a) => self.service_logs.apply(a, now),
        };

        if changed {
            match section {
                Section::Drafts => self.drafts_revision += 1,
                Section::ServiceLogs => self.service_logs_revision += 1,
            }
            for observer in &mut self.observers {
                observer(section);
            }
        }
        changed
    }

    // ── Drafts ──

    /// Create a blank draft dated today through tomorrow and make it active.
    pub fn create_draft(&mut self) -> Uuid {
        let now = self.clock.now();
        let id = Uuid::new_v4();
        let values = FormValues::blank(dates::today(&now), dates::tomorrow(&now));
        self.dispatch(Action::Drafts(DraftAction::Create { id, values }));
        id
    }

    pub fn set_active_draft(&mut self, id: Uuid) {
        self.dispatch(Action::Drafts(DraftAction::SetActive(id)));
    }

    pub fn update_draft_form_values(&mut self, id: Uuid, values: FormValues) {
        self.dispatch(Action::Drafts(DraftAction::UpdateFormValues { id, values }));
    }

    pub fn set_draft_save_status(&mut self, id: Uuid, status: DraftSaveStatus) {
        self.dispatch(Action::Drafts(DraftAction::SetSaveStatus { id, status }));
    }

    pub fn delete_draft(&mut self, id: Uuid) {
        self.dispatch(Action::Drafts(DraftAction::Delete(id)));
    }

    pub fn clear_all_drafts(&mut self) {
        self.dispatch(Action::Drafts(DraftAction::ClearAll));
    }

    // ── Service logs ──

    pub fn create_service_log(&mut self, fields: ServiceLogFields) -> Uuid {
        let id = Uuid::new_v4();
        self.dispatch(Action::ServiceLogs(ServiceLogAction::Create { id, fields }));
        id
    }

    pub fn update_service_log(&mut self, id: Uuid, fields: ServiceLogFields) {
        self.dispatch(Action::ServiceLogs(ServiceLogAction::Update { id, fields }));
    }

    pub fn delete_service_log(&mut self, id: Uuid) {
        self.dispatch(Action::ServiceLogs(ServiceLogAction::Delete(id)));
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(Action::ServiceLogs(ServiceLogAction::SetSearchQuery(
            query.into(),
        )));
    }

    pub fn set_date_range_filter(&mut self, from: Option<String>, to: Option<String>) {
        self.dispatch(Action::ServiceLogs(ServiceLogAction::SetDateRange(
            DateRange { from, to },
        )));
    }

    pub fn set_type_filter(&mut self, service_type: Option<ServiceType>) {
        self.dispatch(Action::ServiceLogs(ServiceLogAction::SetTypeFilter(
            service_type,
        )));
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(Action::ServiceLogs(ServiceLogAction::ClearFilters));
    }
}
