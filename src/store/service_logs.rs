//! Service logs section: finalized logs plus the table's search and filters.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ServiceLog, ServiceLogFields, ServiceType};

/// State owned by the service logs section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLogsState {
    pub items: Vec<ServiceLog>,
    #[serde(default)]
    pub criteria: Criteria,
}

/// Search text and filters applied to the log table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    pub search_query: String,
    pub date_range: DateRange,
    #[serde(rename = "type")]
    pub service_type: Option<ServiceType>,
}

/// Inclusive bounds on a log's start date, as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Transitions of the service logs section.
#[derive(Debug, Clone)]
pub enum ServiceLogAction {
    Create { id: Uuid, fields: ServiceLogFields },
    Update { id: Uuid, fields: ServiceLogFields },
    Delete(Uuid),
    SetSearchQuery(String),
    SetDateRange(DateRange),
    SetTypeFilter(Option<ServiceType>),
    /// Reset the query and every filter together.
    ClearFilters,
}

impl ServiceLogsState {
    /// Apply one action. Returns whether the state changed.
    pub fn apply(&mut self, action: ServiceLogAction, now: Timestamp) -> bool {
        match action {
            ServiceLogAction::Create { id, fields } => {
                self.items.push(ServiceLog {
                    id,
                    fields,
                    created_at: now,
                    updated_at: now,
                });
                true
            }
            ServiceLogAction::Update { id, fields } => {
                let Some(log) = self.items.iter_mut().find(|log| log.id == id) else {
                    tracing::debug!(%id, "ignoring update of unknown service log");
                    return false;
                };
                log.fields = fields;
                log.updated_at = now;
                true
            }
            ServiceLogAction::Delete(id) => {
                let before = self.items.len();
                self.items.retain(|log| log.id != id);
                before != self.items.len()
            }
            ServiceLogAction::SetSearchQuery(query) => {
                replace(&mut self.criteria.search_query, query)
            }
            ServiceLogAction::SetDateRange(range) => replace(&mut self.criteria.date_range, range),
            ServiceLogAction::SetTypeFilter(ty) => replace(&mut self.criteria.service_type, ty),
            ServiceLogAction::ClearFilters => replace(&mut self.criteria, Criteria::default()),
        }
    }

    /// Logs passing the current criteria, in insertion order.
    pub fn filtered(&self) -> Vec<ServiceLog> {
        self.items
            .iter()
            .filter(|log| self.criteria.matches(log))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&ServiceLog> {
        self.items.iter().find(|log| log.id == id)
    }
}

impl Criteria {
    /// Whether any criterion is narrowing the view.
    pub fn is_active(&self) -> bool {
        !self.search_query.trim().is_empty()
            || self.date_range.from.is_some()
            || self.date_range.to.is_some()
            || self.service_type.is_some()
    }

    /// A log matches when it passes the search, date and type tests.
    pub fn matches(&self, log: &ServiceLog) -> bool {
        self.matches_search(log) && self.matches_date_range(log) && self.matches_type(log)
    }

    fn matches_search(&self, log: &ServiceLog) -> bool {
        if self.search_query.trim().is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        let f = &log.fields;
        [
            f.provider_id.as_str(),
            f.service_order.as_str(),
            f.car_id.as_str(),
            f.service_description.as_str(),
            f.service_type.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    // Zero-padded YYYY-MM-DD strings order chronologically.
    fn matches_date_range(&self, log: &ServiceLog) -> bool {
        let start = log.fields.start_date.as_str();
        let after_from = self.date_range.from.as_deref().is_none_or(|from| start >= from);
        let before_to = self.date_range.to.as_deref().is_none_or(|to| start <= to);
        after_from && before_to
    }

    fn matches_type(&self, log: &ServiceLog) -> bool {
        self.service_type
            .is_none_or(|ty| log.fields.service_type == ty)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::new(secs, 0).unwrap()
    }

    fn fields(order: &str, start: &str, ty: ServiceType) -> ServiceLogFields {
        ServiceLogFields {
            provider_id: "ACME Garage".into(),
            service_order: order.into(),
            car_id: "VAN-07".into(),
            odometer: 42_000,
            engine_hours: 1.5,
            start_date: start.into(),
            end_date: crate::dates::add_days(start, 1).unwrap(),
            service_type: ty,
            service_description: "Oil and filter change".into(),
        }
    }

    fn with_logs(logs: &[ServiceLogFields]) -> ServiceLogsState {
        let mut state = ServiceLogsState::default();
        for (i, f) in logs.iter().enumerate() {
            state.apply(
                ServiceLogAction::Create {
                    id: Uuid::new_v4(),
                    fields: f.clone(),
                },
                ts(100 + i64::try_from(i).unwrap()),
            );
        }
        state
    }

    fn orders(state: &ServiceLogsState) -> Vec<String> {
        state
            .filtered()
            .into_iter()
            .map(|log| log.fields.service_order)
            .collect()
    }

    #[test]
    fn create_appends_with_timestamps() {
        let state = with_logs(&[fields("SO-1", "2025-01-10", ServiceType::Planned)]);

        let log = &state.items[0];
        assert_eq!(log.fields.service_order, "SO-1");
        assert_eq!(log.created_at, ts(100));
        assert_eq!(log.updated_at, ts(100));
    }

    #[test]
    fn update_replaces_fields_and_keeps_created_at() {
        let mut state = with_logs(&[fields("SO-1", "2025-01-10", ServiceType::Planned)]);
        let id = state.items[0].id;

        let changed = state.apply(
            ServiceLogAction::Update {
                id,
                fields: fields("SO-2", "2025-02-01", ServiceType::Emergency),
            },
            ts(900),
        );

        assert!(changed);
        let log = state.get(id).unwrap();
        assert_eq!(log.fields.service_order, "SO-2");
        assert_eq!(log.fields.service_type, ServiceType::Emergency);
        assert_eq!(log.created_at, ts(100));
        assert_eq!(log.updated_at, ts(900));
    }

    #[test]
    fn update_and_delete_of_unknown_id_are_ignored() {
        let mut state = with_logs(&[fields("SO-1", "2025-01-10", ServiceType::Planned)]);
        let before = state.clone();

        assert!(!state.apply(
            ServiceLogAction::Update {
                id: Uuid::new_v4(),
                fields: fields("SO-9", "2025-01-10", ServiceType::Planned),
            },
            ts(900),
        ));
        assert!(!state.apply(ServiceLogAction::Delete(Uuid::new_v4()), ts(900)));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_removes_log() {
        let mut state = with_logs(&[
            fields("SO-1", "2025-01-10", ServiceType::Planned),
            fields("SO-2", "2025-01-11", ServiceType::Planned),
        ]);
        let id = state.items[0].id;

        assert!(state.apply(ServiceLogAction::Delete(id), ts(900)));
        assert_eq!(orders(&state), ["SO-2"]);
    }

    #[test]
    fn blank_query_matches_everything() {
        let mut state = with_logs(&[
            fields("SO-1", "2025-01-10", ServiceType::Planned),
            fields("SO-2", "2025-01-11", ServiceType::Emergency),
        ]);
        state.apply(ServiceLogAction::SetSearchQuery("   ".into()), ts(0));

        assert_eq!(orders(&state).len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut a = fields("SO-1", "2025-01-10", ServiceType::Planned);
        a.car_id = "TRUCK-1".into();
        let mut b = fields("SO-2", "2025-01-11", ServiceType::Emergency);
        b.service_description = "Replaced the WATER pump".into();
        let mut state = with_logs(&[a, b]);

        state.apply(ServiceLogAction::SetSearchQuery("truck".into()), ts(0));
        assert_eq!(orders(&state), ["SO-1"]);

        state.apply(ServiceLogAction::SetSearchQuery("Water".into()), ts(0));
        assert_eq!(orders(&state), ["SO-2"]);

        // The type name is searchable too.
        state.apply(ServiceLogAction::SetSearchQuery("EMERG".into()), ts(0));
        assert_eq!(orders(&state), ["SO-2"]);
    }

    #[test]
    fn date_range_from_keeps_later_logs() {
        let mut state = with_logs(&[
            fields("SO-1", "2025-02-01", ServiceType::Planned),
            fields("SO-2", "2025-03-01", ServiceType::Planned),
        ]);

        state.apply(
            ServiceLogAction::SetDateRange(DateRange {
                from: Some("2025-02-15".into()),
                to: None,
            }),
            ts(0),
        );

        assert_eq!(orders(&state), ["SO-2"]);
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let mut state = with_logs(&[
            fields("SO-1", "2025-02-01", ServiceType::Planned),
            fields("SO-2", "2025-03-01", ServiceType::Planned),
            fields("SO-3", "2025-04-01", ServiceType::Planned),
        ]);

        state.apply(
            ServiceLogAction::SetDateRange(DateRange {
                from: Some("2025-02-01".into()),
                to: Some("2025-03-01".into()),
            }),
            ts(0),
        );

        assert_eq!(orders(&state), ["SO-1", "SO-2"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let mut state = with_logs(&[
            fields("SO-1", "2025-02-01", ServiceType::Emergency),
            fields("SO-2", "2025-03-01", ServiceType::Emergency),
            fields("SO-3", "2025-03-05", ServiceType::Planned),
            fields("XX-4", "2025-03-09", ServiceType::Emergency),
        ]);

        state.apply(ServiceLogAction::SetSearchQuery("so-".into()), ts(0));
        state.apply(
            ServiceLogAction::SetDateRange(DateRange {
                from: Some("2025-03-01".into()),
                to: None,
            }),
            ts(0),
        );
        state.apply(
            ServiceLogAction::SetTypeFilter(Some(ServiceType::Emergency)),
            ts(0),
        );
        let all_three = orders(&state);
        assert_eq!(all_three, ["SO-2"]);

        // Every log in the view passes each criterion on its own.
        for log in state.filtered() {
            let c = &state.criteria;
            assert!(c.matches_search(&log) && c.matches_date_range(&log) && c.matches_type(&log));
        }

        // Dropping one criterion can only widen the view.
        state.apply(ServiceLogAction::SetTypeFilter(None), ts(0));
        let without_type = orders(&state);
        assert_eq!(without_type, ["SO-2", "SO-3"]);
        assert!(all_three.iter().all(|o| without_type.contains(o)));
    }

    #[test]
    fn clear_filters_resets_every_criterion() {
        let mut state = with_logs(&[fields("SO-1", "2025-02-01", ServiceType::Planned)]);
        state.apply(ServiceLogAction::SetSearchQuery("nothing".into()), ts(0));
        state.apply(
            ServiceLogAction::SetTypeFilter(Some(ServiceType::Emergency)),
            ts(0),
        );
        assert!(state.criteria.is_active());
        assert!(state.filtered().is_empty());

        assert!(state.apply(ServiceLogAction::ClearFilters, ts(0)));

        assert_eq!(state.criteria, Criteria::default());
        assert!(!state.criteria.is_active());
        assert_eq!(orders(&state), ["SO-1"]);
    }
}
