//! Derived views over store state.
//!
//! The list projections are memoized on the revision of the section they
//! read, so repeated reads between changes return the cached result. A
//! `Selectors` instance must only ever be used with one store.

use crate::model::{Draft, ServiceLog};
use crate::store::{AppStore, Section};

struct Memo<T> {
    revision: Option<u64>,
    value: T,
    computed: u64,
}

impl<T: Default> Memo<T> {
    fn new() -> Self {
        Self {
            revision: None,
            value: T::default(),
            computed: 0,
        }
    }

    fn get(&mut self, revision: u64, compute: impl FnOnce() -> T) -> &T {
        if self.revision != Some(revision) {
            self.value = compute();
            self.revision = Some(revision);
            self.computed += 1;
        }
        &self.value
    }
}

/// Memoized projections of an [`AppStore`].
pub struct Selectors {
    drafts_sorted: Memo<Vec<Draft>>,
    filtered_logs: Memo<Vec<ServiceLog>>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self::new()
    }
}

impl Selectors {
    pub fn new() -> Self {
        Self {
            drafts_sorted: Memo::new(),
            filtered_logs: Memo::new(),
        }
    }

    /// All drafts, most recently updated first.
    pub fn drafts_sorted(&mut self, store: &AppStore) -> &[Draft] {
        self.drafts_sorted
            .get(store.revision(Section::Drafts), || {
                let mut drafts: Vec<Draft> = store.drafts().items.values().cloned().collect();
                drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
                drafts
            })
            .as_slice()
    }

    /// Service logs passing the current search and filters.
    pub fn filtered_logs(&mut self, store: &AppStore) -> &[ServiceLog] {
        self.filtered_logs
            .get(store.revision(Section::ServiceLogs), || {
                store.service_logs().filtered()
            })
            .as_slice()
    }
}

pub fn active_draft(store: &AppStore) -> Option<&Draft> {
    store.drafts().active()
}

pub fn draft_count(store: &AppStore) -> usize {
    store.drafts().items.len()
}

pub fn log_count(store: &AppStore) -> usize {
    store.service_logs().items.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{ServiceLogFields, ServiceType};
    use crate::store::testing::store;

    fn fields(order: &str, start: &str) -> ServiceLogFields {
        ServiceLogFields {
            provider_id: "ACME".into(),
            service_order: order.into(),
            car_id: "VAN-07".into(),
            odometer: 10,
            engine_hours: 0.5,
            start_date: start.into(),
            end_date: "2099-01-01".into(),
            service_type: ServiceType::Planned,
            service_description: "Tyre rotation and check".into(),
        }
    }

    #[test]
    fn drafts_sorted_most_recent_first() {
        let (mut store, clock) = store();
        let first = store.create_draft();
        clock.advance_secs(10);
        let second = store.create_draft();
        clock.advance_secs(10);
        let values = store.drafts().items[&first].form_values.clone();
        store.update_draft_form_values(first, values);

        let mut selectors = Selectors::new();
        let ids: Vec<_> = selectors.drafts_sorted(&store).iter().map(|d| d.id).collect();

        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn lists_recompute_only_after_their_section_changes() {
        let (mut store, _clock) = store();
        let mut selectors = Selectors::new();
        store.create_draft();

        selectors.drafts_sorted(&store);
        selectors.drafts_sorted(&store);
        assert_eq!(selectors.drafts_sorted.computed, 1);

        // A service log change leaves the draft projection cached.
        store.create_service_log(fields("SO-1", "2025-01-01"));
        selectors.drafts_sorted(&store);
        assert_eq!(selectors.drafts_sorted.computed, 1);

        assert_eq!(selectors.filtered_logs(&store).len(), 1);
        store.set_search_query("nothing matches this");
        assert!(selectors.filtered_logs(&store).is_empty());
        assert_eq!(selectors.filtered_logs.computed, 2);
    }

    #[test]
    fn counts_and_active_lookup() {
        let (mut store, _clock) = store();
        assert_eq!(draft_count(&store), 0);
        assert!(active_draft(&store).is_none());

        let id = store.create_draft();
        store.create_service_log(fields("SO-1", "2025-02-01"));
        store.create_service_log(fields("SO-2", "2025-03-01"));
        store.set_date_range_filter(Some("2025-02-15".into()), None);

        let mut selectors = Selectors::new();
        assert_eq!(draft_count(&store), 1);
        assert_eq!(active_draft(&store).map(|d| d.id), Some(id));
        assert_eq!(log_count(&store), 2);
        let view = selectors.filtered_logs(&store);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].fields.service_order, "SO-2");
    }
}
