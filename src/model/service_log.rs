//! Service log: a finalized, validated record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ServiceType;

/// The domain fields of a service log, already validated.
///
/// Built only by form validation, so a log can never hold an unset
/// odometer or an end date that does not follow its start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLogFields {
    pub provider_id: String,
    pub service_order: String,
    pub car_id: String,
    pub odometer: u64,
    pub engine_hours: f64,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub service_description: String,
}

/// A persisted service log.
///
/// Serializes flat: `id`, the domain fields, then the timestamps. The
/// export file uses exactly this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLog {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ServiceLogFields,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
