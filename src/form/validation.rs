//! Field rules for the service log form.
//!
//! Per-field checks go through `validator`; the numeric-shape checks and the
//! cross-field end date rule run afterwards. Each failing field reports the
//! message of its first failing rule.

use std::collections::BTreeMap;
use std::fmt;

use validator::{Validate, ValidationError};

use crate::model::{FormValues, ServiceLogFields};

const MIN_DESCRIPTION_LEN: usize = 10;

/// Largest odometer reading an `f64` holds exactly (2^53 - 1).
const MAX_ODOMETER: f64 = 9_007_199_254_740_991.0;

/// A form field, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    ProviderId,
    ServiceOrder,
    CarId,
    Odometer,
    EngineHours,
    StartDate,
    EndDate,
    Type,
    ServiceDescription,
}

impl Field {
    /// The field's serialized (camelCase) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProviderId => "providerId",
            Self::ServiceOrder => "serviceOrder",
            Self::CarId => "carId",
            Self::Odometer => "odometer",
            Self::EngineHours => "engineHours",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::Type => "type",
            Self::ServiceDescription => "serviceDescription",
        }
    }

    fn from_rule_key(key: &str) -> Option<Self> {
        Some(match key {
            "provider_id" => Self::ProviderId,
            "service_order" => Self::ServiceOrder,
            "car_id" => Self::CarId,
            "odometer" => Self::Odometer,
            "engine_hours" => Self::EngineHours,
            "start_date" => Self::StartDate,
            "end_date" => Self::EndDate,
            "service_description" => Self::ServiceDescription,
            _ => return None,
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rule {
    Required,
    Number,
    NonNegative,
    WholeNumber,
    TooLarge,
    AfterStart,
    MinLength,
}

impl Rule {
    fn from_code(code: &str) -> Self {
        match code {
            "range" => Self::NonNegative,
            "too_short" => Self::MinLength,
            _ => Self::Required,
        }
    }
}

fn message(field: Field, rule: Rule) -> &'static str {
    match (field, rule) {
        (Field::ProviderId, _) => "Provider ID is required",
        (Field::ServiceOrder, _) => "Service order is required",
        (Field::CarId, _) => "Car ID is required",
        (Field::Odometer, Rule::Number) => "Odometer must be a number",
        (Field::Odometer, Rule::NonNegative) => "Odometer cannot be negative",
        (Field::Odometer, Rule::WholeNumber) => "Odometer must be a whole number",
        (Field::Odometer, Rule::TooLarge) => "Odometer is too large",
        (Field::Odometer, _) => "Odometer is required",
        (Field::EngineHours, Rule::Number) => "Engine hours must be a number",
        (Field::EngineHours, Rule::NonNegative) => "Engine hours cannot be negative",
        (Field::EngineHours, _) => "Engine hours is required",
        (Field::StartDate, _) => "Start date is required",
        (Field::EndDate, Rule::AfterStart) => "End date must be after start date",
        (Field::EndDate, _) => "End date is required",
        (Field::Type, _) => "Invalid service type",
        (Field::ServiceDescription, Rule::MinLength) => "Description must be at least 10 characters",
        (Field::ServiceDescription, _) => "Description is required",
    }
}

/// Per-field validation messages, one per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Failing rules collected while checking, keeping the first rule per field.
#[derive(Default)]
struct Failures(BTreeMap<Field, Rule>);

impl Failures {
    fn add(&mut self, field: Field, rule: Rule) {
        let slot = self.0.entry(field).or_insert(rule);
        if rule < *slot {
            *slot = rule;
        }
    }

    fn into_errors(self) -> FieldErrors {
        FieldErrors(
            self.0
                .into_iter()
                .map(|(field, rule)| (field, message(field, rule)))
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, msg)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {msg}")?;
        }
        Ok(())
    }
}

/// The rules `validator` can express on their own.
#[derive(Validate)]
struct FieldRules {
    #[validate(custom = "not_blank")]
    provider_id: String,
    #[validate(custom = "not_blank")]
    service_order: String,
    #[validate(custom = "not_blank")]
    car_id: String,
    #[validate(required, range(min = 0.0))]
    odometer: Option<f64>,
    #[validate(required, range(min = 0.0))]
    engine_hours: Option<f64>,
    #[validate(custom = "not_blank")]
    start_date: String,
    #[validate(custom = "not_blank")]
    end_date: String,
    #[validate(custom = "min_description")]
    service_description: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn min_description(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("required"));
    }
    if trimmed.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(ValidationError::new("too_short"));
    }
    Ok(())
}

/// Check every field and, when all pass, build the validated log fields.
///
/// String fields come back trimmed. The service type needs no check: the
/// closed enum cannot hold anything else.
pub fn validate(values: &FormValues) -> Result<ServiceLogFields, FieldErrors> {
    let mut failures = Failures::default();

    let rules = FieldRules {
        provider_id: values.provider_id.clone(),
        service_order: values.service_order.clone(),
        car_id: values.car_id.clone(),
        odometer: values.odometer,
        engine_hours: values.engine_hours,
        start_date: values.start_date.clone(),
        end_date: values.end_date.clone(),
        service_description: values.service_description.clone(),
    };
    if let Err(report) = rules.validate() {
        for (key, field_errors) in report.field_errors() {
            let Some(field) = Field::from_rule_key(key) else {
                continue;
            };
            for e in field_errors {
                failures.add(field, Rule::from_code(&e.code));
            }
        }
    }

    for (field, value) in [
        (Field::Odometer, values.odometer),
        (Field::EngineHours, values.engine_hours),
    ] {
        if value.is_some_and(|v| !v.is_finite()) {
            failures.add(field, Rule::Number);
        }
    }
    if values
        .odometer
        .is_some_and(|v| v.is_finite() && v.fract() != 0.0)
    {
        failures.add(Field::Odometer, Rule::WholeNumber);
    }
    if values
        .odometer
        .is_some_and(|v| v.is_finite() && v > MAX_ODOMETER)
    {
        failures.add(Field::Odometer, Rule::TooLarge);
    }

    let start = values.start_date.trim();
    let end = values.end_date.trim();
    if !start.is_empty() && !end.is_empty() && end <= start {
        failures.add(Field::EndDate, Rule::AfterStart);
    }

    let errors = failures.into_errors();
    let (Some(odometer), Some(engine_hours)) = (values.odometer, values.engine_hours) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    // In range: whole, non-negative and at most MAX_ODOMETER.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let odometer = odometer as u64;

    Ok(ServiceLogFields {
        provider_id: values.provider_id.trim().to_string(),
        service_order: values.service_order.trim().to_string(),
        car_id: values.car_id.trim().to_string(),
        odometer,
        engine_hours,
        start_date: start.to_string(),
        end_date: end.to_string(),
        service_type: values.service_type,
        service_description: values.service_description.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::ServiceType;

    fn valid() -> FormValues {
        FormValues {
            provider_id: "ACME Garage".into(),
            service_order: "SO-1".into(),
            car_id: "VAN-07".into(),
            odometer: Some(100.0),
            engine_hours: Some(2.0),
            start_date: "2025-01-10".into(),
            end_date: "2025-01-11".into(),
            service_type: ServiceType::Unplanned,
            service_description: "Replaced front brake pads".into(),
        }
    }

    #[test]
    fn valid_values_produce_numeric_fields() {
        let fields = validate(&valid()).unwrap();

        assert_eq!(fields.odometer, 100);
        assert!((fields.engine_hours - 2.0).abs() < f64::EPSILON);
        assert!(fields.end_date > fields.start_date);
        assert_eq!(fields.service_type, ServiceType::Unplanned);
    }

    #[test]
    fn strings_are_trimmed() {
        let mut values = valid();
        values.provider_id = "  ACME  ".into();
        values.service_description = "  Replaced front brake pads \n".into();

        let fields = validate(&values).unwrap();
        assert_eq!(fields.provider_id, "ACME");
        assert_eq!(fields.service_description, "Replaced front brake pads");
    }

    #[test]
    fn blank_form_reports_every_required_field() {
        let values = FormValues::blank(String::new(), String::new());
        let errors = validate(&values).unwrap_err();

        let expected = [
            (Field::ProviderId, "Provider ID is required"),
            (Field::ServiceOrder, "Service order is required"),
            (Field::CarId, "Car ID is required"),
            (Field::Odometer, "Odometer is required"),
            (Field::EngineHours, "Engine hours is required"),
            (Field::StartDate, "Start date is required"),
            (Field::EndDate, "End date is required"),
            (Field::ServiceDescription, "Description is required"),
        ];
        assert_eq!(errors.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn whitespace_only_strings_are_missing() {
        let mut values = valid();
        values.car_id = "   ".into();

        let errors = validate(&values).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::CarId), Some("Car ID is required"));
    }

    #[test]
    fn odometer_rules() {
        let mut values = valid();

        values.odometer = Some(-1.0);
        assert_eq!(
            validate(&values).unwrap_err().get(Field::Odometer),
            Some("Odometer cannot be negative")
        );

        values.odometer = Some(10.5);
        assert_eq!(
            validate(&values).unwrap_err().get(Field::Odometer),
            Some("Odometer must be a whole number")
        );

        values.odometer = Some(f64::NAN);
        assert_eq!(
            validate(&values).unwrap_err().get(Field::Odometer),
            Some("Odometer must be a number")
        );

        values.odometer = Some(0.0);
        assert_eq!(validate(&values).unwrap().odometer, 0);
    }

    #[test]
    fn odometer_beyond_exact_integers_is_rejected() {
        let mut values = valid();

        values.odometer = Some(1e20);
        assert_eq!(
            validate(&values).unwrap_err().get(Field::Odometer),
            Some("Odometer is too large")
        );

        values.odometer = Some(MAX_ODOMETER);
        assert_eq!(validate(&values).unwrap().odometer, 9_007_199_254_740_991);
    }

    #[test]
    fn engine_hours_allow_fractions_but_not_negatives() {
        let mut values = valid();

        values.engine_hours = Some(1.25);
        assert!(validate(&values).is_ok());

        values.engine_hours = Some(-0.5);
        assert_eq!(
            validate(&values).unwrap_err().get(Field::EngineHours),
            Some("Engine hours cannot be negative")
        );
    }

    #[test]
    fn end_date_must_follow_start_date() {
        let mut values = valid();

        values.end_date = "2025-01-10".into();
        assert_eq!(
            validate(&values).unwrap_err().get(Field::EndDate),
            Some("End date must be after start date")
        );

        values.end_date = "2025-01-09".into();
        assert!(validate(&values).is_err());
    }

    #[test]
    fn description_needs_ten_trimmed_characters() {
        let mut values = valid();

        values.service_description = "  ten chars!  ".into();
        assert!(validate(&values).is_ok());

        values.service_description = "   short   ".into();
        assert_eq!(
            validate(&values).unwrap_err().get(Field::ServiceDescription),
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn errors_display_one_field_per_line() {
        let mut values = valid();
        values.provider_id.clear();
        values.odometer = None;

        let text = validate(&values).unwrap_err().to_string();
        assert_eq!(
            text,
            "providerId: Provider ID is required\nodometer: Odometer is required"
        );
    }
}
