//! Output formatting for CLI display.

use jiff::Zoned;
use uuid::Uuid;

use crate::dates::format_relative_time;
use crate::model::{Draft, DraftSaveStatus, ServiceLog};
use crate::store::Criteria;

/// First eight hex digits of an id.
pub(super) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Group digits in threes: `42000` → `42,000`.
pub(super) fn format_odometer(miles: u64) -> String {
    let digits = miles.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_save_status(status: DraftSaveStatus) -> &'static str {
    match status {
        DraftSaveStatus::Idle => "idle",
        DraftSaveStatus::Saving => "saving",
        DraftSaveStatus::Saved => "saved",
    }
}

/// One line of `draft list`.
pub(super) fn format_draft_row(draft: &Draft, active: bool, now: &Zoned) -> String {
    let marker = if active { '*' } else { ' ' };
    let order = draft.form_values.service_order.trim();
    let title = if order.is_empty() { "(untitled)" } else { order };
    format!(
        "{marker} {}  [{}]  {:<10}  {title}",
        short_id(draft.id),
        format_save_status(draft.save_status),
        format_relative_time(draft.updated_at, now),
    )
}

pub(super) const LOG_HEADER: &str =
    "ID        SERVICE ORDER  PROVIDER      CAR ID      ODOMETER (MI)  START       END         TYPE";

/// One line of `log list`, aligned under [`LOG_HEADER`].
pub(super) fn format_log_row(log: &ServiceLog) -> String {
    let f = &log.fields;
    format!(
        "{}  {:<13}  {:<12}  {:<10}  {:>13}  {}  {}  {}",
        short_id(log.id),
        truncate(&f.service_order, 13),
        truncate(&f.provider_id, 12),
        truncate(&f.car_id, 10),
        format_odometer(f.odometer),
        f.start_date,
        f.end_date,
        f.service_type.label(),
    )
}

/// `Service logs (shown / total)`, or just the total when nothing is hidden.
pub(super) fn format_log_count(shown: usize, total: usize) -> String {
    if shown == total {
        format!("Service logs ({total})")
    } else {
        format!("Service logs ({shown} / {total})")
    }
}

/// Human summary of the active search and filters.
pub(super) fn format_criteria(criteria: &Criteria) -> String {
    if !criteria.is_active() {
        return "no filters".to_string();
    }
    let mut parts = Vec::new();
    let query = criteria.search_query.trim();
    if !query.is_empty() {
        parts.push(format!("search \"{query}\""));
    }
    match (&criteria.date_range.from, &criteria.date_range.to) {
        (Some(from), Some(to)) => parts.push(format!("start {from} to {to}")),
        (Some(from), None) => parts.push(format!("start from {from}")),
        (None, Some(to)) => parts.push(format!("start until {to}")),
        (None, None) => {}
    }
    if let Some(ty) = criteria.service_type {
        parts.push(format!("type {}", ty.as_str()));
    }
    parts.join(", ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}
