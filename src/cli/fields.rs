//! Form field flags shared by `draft set` and `log edit`.

use clap::{Args, ValueEnum};

use crate::form::FieldUpdate;
use crate::model::ServiceType;

/// CLI-facing service type, mapped to the domain `ServiceType`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    /// Scheduled maintenance.
    Planned,
    /// Unscheduled, non-emergency visit.
    Unplanned,
    /// Breakdown or roadside repair.
    Emergency,
}

impl TypeArg {
    pub(super) fn to_domain(self) -> ServiceType {
        match self {
            Self::Planned => ServiceType::Planned,
            Self::Unplanned => ServiceType::Unplanned,
            Self::Emergency => ServiceType::Emergency,
        }
    }
}

/// Field values to write. Unset flags leave the field as it is.
#[derive(Debug, Default, Args)]
pub struct FieldArgs {
    /// Service provider identifier.
    #[arg(long)]
    provider: Option<String>,

    /// Service order identifier.
    #[arg(long)]
    order: Option<String>,

    /// Car identifier.
    #[arg(long)]
    car: Option<String>,

    /// Odometer reading in miles.
    #[arg(long, allow_negative_numbers = true)]
    odometer: Option<f64>,

    /// Engine hours.
    #[arg(long, allow_negative_numbers = true)]
    engine_hours: Option<f64>,

    /// Start date (`YYYY-MM-DD`). Moves the end date to the next day.
    #[arg(long)]
    start: Option<String>,

    /// End date (`YYYY-MM-DD`). Applied after `--start`.
    #[arg(long)]
    end: Option<String>,

    /// Service type.
    #[arg(long = "type", value_enum)]
    service_type: Option<TypeArg>,

    /// What was done.
    #[arg(long)]
    description: Option<String>,

    /// Clear the odometer reading.
    #[arg(long, conflicts_with = "odometer")]
    clear_odometer: bool,

    /// Clear the engine hours.
    #[arg(long, conflicts_with = "engine_hours")]
    clear_engine_hours: bool,
}

impl FieldArgs {
    /// The edits in form order, start date before end date so an explicit
    /// `--end` survives the date sync.
    pub(super) fn into_updates(self) -> Vec<FieldUpdate> {
        let odometer = if self.clear_odometer {
            Some(None)
        } else {
            self.odometer.map(Some)
        };
        let engine_hours = if self.clear_engine_hours {
            Some(None)
        } else {
            self.engine_hours.map(Some)
        };

        [
            self.provider.map(FieldUpdate::ProviderId),
            self.order.map(FieldUpdate::ServiceOrder),
            self.car.map(FieldUpdate::CarId),
            odometer.map(FieldUpdate::Odometer),
            engine_hours.map(FieldUpdate::EngineHours),
            self.start.map(FieldUpdate::StartDate),
            self.end.map(FieldUpdate::EndDate),
            self.service_type
                .map(|t| FieldUpdate::Type(t.to_domain())),
            self.description.map(FieldUpdate::ServiceDescription),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_keep_start_before_end() {
        let args = FieldArgs {
            end: Some("2025-02-01".into()),
            start: Some("2025-01-10".into()),
            ..FieldArgs::default()
        };

        assert_eq!(
            args.into_updates(),
            [
                FieldUpdate::StartDate("2025-01-10".into()),
                FieldUpdate::EndDate("2025-02-01".into()),
            ]
        );
    }

    #[test]
    fn clear_flags_unset_numerics() {
        let args = FieldArgs {
            clear_odometer: true,
            engine_hours: Some(3.5),
            service_type: Some(TypeArg::Emergency),
            ..FieldArgs::default()
        };

        assert_eq!(
            args.into_updates(),
            [
                FieldUpdate::Odometer(None),
                FieldUpdate::EngineHours(Some(3.5)),
                FieldUpdate::Type(ServiceType::Emergency),
            ]
        );
    }

    #[test]
    fn no_flags_no_updates() {
        assert!(FieldArgs::default().into_updates().is_empty());
    }
}
