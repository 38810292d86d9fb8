//! The editable, pre-validation shape of a service log.

use serde::{Deserialize, Serialize};

use super::{ServiceLog, ServiceType};

/// Form field values as the user typed them.
///
/// Numeric fields are `None` while empty, which is distinct from zero.
/// Dates are `YYYY-MM-DD` strings and are only parsed by the date sync
/// rule and by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub provider_id: String,
    pub service_order: String,
    pub car_id: String,
    pub odometer: Option<f64>,
    pub engine_hours: Option<f64>,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub service_description: String,
}

impl FormValues {
    /// Blank values with the given date range and a planned service type.
    pub fn blank(start_date: String, end_date: String) -> Self {
        Self {
            provider_id: String::new(),
            service_order: String::new(),
            car_id: String::new(),
            odometer: None,
            engine_hours: None,
            start_date,
            end_date,
            service_type: ServiceType::Planned,
            service_description: String::new(),
        }
    }
}

impl From<&ServiceLog> for FormValues {
    #[allow(clippy::cast_precision_loss)]
    fn from(log: &ServiceLog) -> Self {
        let f = &log.fields;
        Self {
            provider_id: f.provider_id.clone(),
            service_order: f.service_order.clone(),
            car_id: f.car_id.clone(),
            odometer: Some(f.odometer as f64),
            engine_hours: Some(f.engine_hours),
            start_date: f.start_date.clone(),
            end_date: f.end_date.clone(),
            service_type: f.service_type,
            service_description: f.service_description.clone(),
        }
    }
}
