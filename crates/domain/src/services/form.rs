//! Form state for one editing session of the studio settings.
//!
//! Values stay in their UI representation until [`SettingsForm::cast`]
//! produces the update payload. Every edit re-runs the validator and the
//! visibility resolver, so `errors` and `active` are never stale.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{
    FieldKind, FieldValue, FormValues, SettingField, SettingsId, SettingsPayload, StudioSettings,
    UnknownField, NULL_VALUE,
};
use crate::services::validation::{validate_values, FieldError, ValidationReport};
use crate::services::visibility::{resolve_active_fields, ActiveFields};

/// Input rejected at the form-control boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

#[derive(Debug, Clone)]
pub struct SettingsForm {
    values: FormValues,
    baseline: StudioSettings,
    baseline_json: Map<String, Value>,
    touched: BTreeSet<SettingField>,
    active: ActiveFields,
    report: ValidationReport,
    /// Failures of active fields only.
    errors: BTreeMap<SettingField, FieldError>,
}

impl SettingsForm {
    pub fn new(settings: &StudioSettings) -> Self {
        let mut form = Self {
            values: FormValues::from_settings(settings),
            baseline: settings.clone(),
            baseline_json: settings_json(settings),
            touched: BTreeSet::new(),
            active: ActiveFields::default(),
            report: ValidationReport::default(),
            errors: BTreeMap::new(),
        };
        form.refresh();
        form
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: SettingField) -> &FieldValue {
        self.values.get(field).unwrap_or(&NULL_VALUE)
    }

    pub fn baseline(&self) -> &StudioSettings {
        &self.baseline
    }

    pub fn active(&self) -> &ActiveFields {
        &self.active
    }

    pub fn is_active(&self, field: SettingField) -> bool {
        self.active.contains(field)
    }

    pub fn is_touched(&self, field: SettingField) -> bool {
        self.touched.contains(&field)
    }

    /// Full validation outcome, hidden fields included.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Stores `value`, marks the field touched and re-evaluates the form.
    ///
    /// Boolean fields receiving a `"true"`/`"false"` token store the native
    /// boolean.
    pub fn set_field(&mut self, field: SettingField, value: FieldValue) {
        let value = match (field.is_boolean(), value.as_bool()) {
            (true, Some(flag)) => FieldValue::Bool(flag),
            _ => value,
        };
        self.values.insert(field, value);
        self.touched.insert(field);
        self.refresh();
    }

    /// Applies raw input from a form control addressed by wire name.
    pub fn set_field_input(&mut self, name: &str, raw: &str) -> Result<SettingField, InputError> {
        let field: SettingField = name.parse()?;
        let value = match field.kind() {
            FieldKind::Boolean(_) => shared::validation::parse_bool_token(raw)
                .map(FieldValue::Bool)
                .unwrap_or_else(|_| FieldValue::text(raw)),
            FieldKind::Text if raw.is_empty() => FieldValue::Null,
            FieldKind::Number(_) | FieldKind::Choice(_) | FieldKind::Text => FieldValue::text(raw),
        };
        self.set_field(field, value);
        Ok(field)
    }

    fn refresh(&mut self) {
        self.active = resolve_active_fields(&self.values);
        self.report = validate_values(&self.values);
        self.errors = self
            .report
            .failures()
            .filter(|(field, _)| self.active.contains(*field))
            .map(|(field, err)| (field, err.clone()))
            .collect();
    }

    /// Error of an active field, whether or not it is shown yet.
    pub fn error(&self, field: SettingField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn errors(&self) -> impl Iterator<Item = (SettingField, &FieldError)> {
        self.errors.iter().map(|(field, err)| (*field, err))
    }

    /// Error rendered next to the control: only for touched, active fields.
    pub fn visible_error(&self, field: SettingField) -> Option<&FieldError> {
        if self.is_touched(field) {
            self.error(field)
        } else {
            None
        }
    }

    /// Failure recorded for `field` regardless of visibility.
    pub fn internal_error(&self, field: SettingField) -> Option<&FieldError> {
        self.report.error(field)
    }

    /// Whether an active field is invalid. Hidden fields never block.
    pub fn has_blocking_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Marks every active field touched so each blocking error shows.
    pub fn touch_all_active(&mut self) {
        self.touched.extend(self.active.iter());
    }

    pub fn is_dirty(&self) -> bool {
        SettingField::ALL.into_iter().any(|field| self.differs(field))
    }

    pub fn dirty_fields(&self) -> Vec<SettingField> {
        SettingField::ALL
            .into_iter()
            .filter(|field| self.differs(*field))
            .collect()
    }

    fn differs(&self, field: SettingField) -> bool {
        cast_value(field, self.value(field)).as_ref() != self.baseline_json.get(field.as_str())
    }

    /// Casts every declared field to its native type and attaches `id`.
    ///
    /// A value that cannot be cast is replaced by its baseline value.
    pub fn cast(&self, id: SettingsId) -> SettingsPayload {
        let values = SettingField::ALL
            .into_iter()
            .map(|field| {
                let value = cast_value(field, self.value(field))
                    .or_else(|| self.baseline_json.get(field.as_str()).cloned())
                    .unwrap_or(Value::Null);
                (field.as_str().to_string(), value)
            })
            .collect();
        SettingsPayload { id, values }
    }

    /// Adopts settings the store persisted from `sent`.
    ///
    /// Fields edited after `sent` was cast keep their current value and stay
    /// touched. Every other field takes the stored value.
    pub fn commit_saved(&mut self, settings: &StudioSettings, sent: &SettingsPayload) {
        let pending: Vec<(SettingField, FieldValue)> = SettingField::ALL
            .into_iter()
            .filter(|field| {
                cast_value(*field, self.value(*field)).as_ref() != sent.get(field.as_str())
            })
            .map(|field| (field, self.value(field).clone()))
            .collect();

        self.values = FormValues::from_settings(settings);
        self.baseline = settings.clone();
        self.baseline_json = settings_json(settings);
        self.touched.clear();
        for (field, value) in pending {
            self.values.insert(field, value);
            self.touched.insert(field);
        }
        self.refresh();
    }

    /// Adopts the persisted settings as both values and baseline.
    pub fn replace_baseline(&mut self, settings: &StudioSettings) {
        self.values = FormValues::from_settings(settings);
        self.baseline = settings.clone();
        self.baseline_json = settings_json(settings);
        self.touched.clear();
        self.refresh();
    }
}

fn settings_json(settings: &StudioSettings) -> Map<String, Value> {
    match serde_json::to_value(settings) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Native JSON value of `value` for `field`, or `None` when it cannot be cast.
fn cast_value(field: SettingField, value: &FieldValue) -> Option<Value> {
    match field.kind() {
        FieldKind::Number(rule) => {
            let number = match value {
                FieldValue::Number(number) => *number,
                FieldValue::Text(text) => shared::validation::parse_number(text).ok()?,
                FieldValue::Null | FieldValue::Bool(_) => return None,
            };
            if !rule.integer {
                serde_json::Number::from_f64(number).map(Value::Number)
            } else if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
                Some(Value::from(number as i64))
            } else {
                None
            }
        }
        FieldKind::Boolean(_) => value.as_bool().map(Value::Bool),
        FieldKind::Choice(_) => match value {
            FieldValue::Text(text) => Some(Value::String(text.clone())),
            _ => None,
        },
        FieldKind::Text => match value {
            FieldValue::Null => Some(Value::Null),
            FieldValue::Text(text) if text.is_empty() => Some(Value::Null),
            FieldValue::Text(text) => Some(Value::String(text.clone())),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    fn form() -> SettingsForm {
        SettingsForm::new(&StudioSettings::default())
    }

    #[test]
    fn test_new_form_is_clean() {
        let form = form();
        assert!(!form.is_dirty());
        assert!(!form.has_blocking_errors());
        assert!(form.report().is_clean());
        assert!(!form.is_active(SettingField::MaxCreditAge));
    }

    #[test]
    fn test_toggle_restores_dependent_value() {
        let mut form = form();
        form.set_field_input("cancellationDeadline", "36").unwrap();
        form.set_field_input("permitCancellations", "false").unwrap();
        assert!(!form.is_active(SettingField::CancellationDeadline));
        form.set_field_input("permitCancellations", "true").unwrap();
        assert!(form.is_active(SettingField::CancellationDeadline));
        assert_eq!(
            form.value(SettingField::CancellationDeadline),
            &FieldValue::text("36")
        );
    }

    #[test]
    fn test_input_tokens_become_booleans() {
        let mut form = form();
        let field = form.set_field_input("weekends", "false").unwrap();
        assert_eq!(field, SettingField::Weekends);
        assert_eq!(form.value(SettingField::Weekends), &FieldValue::Bool(false));

        form.set_field(SettingField::PermitEventRegistration, FieldValue::text("true"));
        assert_eq!(
            form.value(SettingField::PermitEventRegistration),
            &FieldValue::Bool(true)
        );
        assert!(form.is_active(SettingField::EventRegistrationDeadline));
    }

    #[test]
    fn test_empty_text_input_is_null() {
        let mut form = form();
        form.set_field_input("location", "").unwrap();
        assert_eq!(form.value(SettingField::Location), &FieldValue::Null);
        form.set_field_input("location", "Studio B").unwrap();
        assert_eq!(form.value(SettingField::Location), &FieldValue::text("Studio B"));
    }

    #[test]
    fn test_unknown_input_name() {
        let mut form = form();
        let err = form.set_field_input("studioName", "x").unwrap_err();
        assert_eq!(err, InputError::UnknownField(UnknownField("studioName".to_string())));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_hidden_invalid_deadline_does_not_block() {
        let mut form = form();
        form.set_field(SettingField::PermitCancellations, FieldValue::Bool(false));
        form.set_field_input("cancellationDeadline", "-5").unwrap();

        assert!(matches!(
            form.internal_error(SettingField::CancellationDeadline),
            Some(FieldError::Range(_))
        ));
        assert!(form.visible_error(SettingField::CancellationDeadline).is_none());
        assert!(form.error(SettingField::CancellationDeadline).is_none());
        assert!(!form.has_blocking_errors());

        let payload = form.cast(SettingsId(1));
        assert_eq!(payload.get("cancellationDeadline"), Some(&json!(-5)));
        assert_eq!(payload.get("permitCancellations"), Some(&json!(false)));
    }

    #[test]
    fn test_visible_range_error_blocks_submit() {
        let mut form = form();
        form.set_field_input("permitMakeUpCredits", "true").unwrap();
        form.set_field_input("expireMakeUpCredits", "true").unwrap();
        form.set_field_input("maxCreditAge", "400").unwrap();

        let err = form.visible_error(SettingField::MaxCreditAge).unwrap();
        assert_eq!(err, &FieldError::Range("Must be less than 366".to_string()));
        assert!(form.has_blocking_errors());
        assert_eq!(form.errors().count(), 1);
    }

    #[test]
    fn test_untouched_errors_show_after_touch_all() {
        let settings = StudioSettings {
            max_total_make_up_credits: 80,
            limit_total_make_up_credits: true,
            ..StudioSettings::default()
        };
        let mut form = SettingsForm::new(&settings);
        assert!(form.has_blocking_errors());
        assert!(form.visible_error(SettingField::MaxTotalMakeUpCredits).is_none());

        form.touch_all_active();
        assert_eq!(
            form.visible_error(SettingField::MaxTotalMakeUpCredits)
                .map(FieldError::message),
            Some("Must be less than 51")
        );
        assert!(!form.is_touched(SettingField::MaxCreditAge));
    }

    #[test]
    fn test_dirty_tracking_compares_cast_values() {
        let mut form = form();
        form.set_field_input("cancellationDeadline", "24").unwrap();
        assert!(!form.is_dirty());

        form.set_field_input("defaultLessonPrice", "42.5").unwrap();
        form.set_field_input("initialView", "dayGridMonth").unwrap();
        assert_eq!(
            form.dirty_fields(),
            vec![SettingField::DefaultLessonPrice, SettingField::InitialView]
        );
    }

    #[test]
    fn test_cast_round_trip_validates() {
        let mut form = form();
        form.set_field_input("defaultLessonPrice", "75.25").unwrap();
        form.set_field_input("defaultLessonDuration", "45").unwrap();
        form.set_field_input("permitEventRegistration", "true").unwrap();
        form.set_field_input("eventRegistrationDeadline", "12").unwrap();
        form.set_field_input("slotMinTime", "07:00").unwrap();
        form.set_field_input("cancellationPolicySummary", "Give a day's notice").unwrap();
        assert!(!form.has_blocking_errors());

        let payload = form.cast(SettingsId(3));
        assert_eq!(payload.values.len(), SettingField::ALL.len());
        assert_eq!(payload.get("defaultLessonDuration"), Some(&json!(45)));
        assert_eq!(payload.get("defaultLessonPrice"), Some(&json!(75.25)));
        assert_eq!(payload.get("permitEventRegistration"), Some(&json!(true)));
        assert_eq!(payload.get("location"), Some(&json!(null)));

        let settings = payload.to_settings().unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.event_registration_deadline, 12);

        let recast = SettingsForm::new(&settings);
        assert!(recast.report().is_clean());
        assert_eq!(recast.cast(SettingsId(3)), payload);
    }

    #[test]
    fn test_uncastable_hidden_value_falls_back_to_baseline() {
        let mut form = form();
        form.set_field_input("limitTotalMakeUpCredits", "false").unwrap();
        form.set_field_input("maxTotalMakeUpCredits", "lots").unwrap();
        assert!(!form.has_blocking_errors());

        let payload = form.cast(SettingsId(1));
        assert_eq!(payload.get("maxTotalMakeUpCredits"), Some(&json!(5)));
        assert!(payload.to_settings().is_ok());
    }

    #[test]
    fn test_commit_saved_keeps_edits_made_after_cast() {
        let mut form = form();
        form.set_field_input("weekends", "false").unwrap();
        let sent = form.cast(SettingsId(1));

        form.set_field_input("location", "Room 4").unwrap();
        let saved = sent.to_settings().unwrap();
        form.commit_saved(&saved, &sent);

        assert_eq!(form.baseline(), &saved);
        assert_eq!(form.value(SettingField::Location), &FieldValue::text("Room 4"));
        assert_eq!(form.value(SettingField::Weekends), &FieldValue::Bool(false));
        assert_eq!(form.dirty_fields(), vec![SettingField::Location]);
        assert!(form.is_touched(SettingField::Location));
        assert!(!form.is_touched(SettingField::Weekends));
    }

    #[test]
    fn test_commit_saved_takes_stored_values() {
        let mut form = form();
        form.set_field_input("cancellationDeadline", "12").unwrap();
        let sent = form.cast(SettingsId(1));

        let stored = StudioSettings {
            cancellation_deadline: 12,
            location: Some("Set elsewhere".to_string()),
            ..StudioSettings::default()
        };
        form.commit_saved(&stored, &sent);
        assert!(!form.is_dirty());
        assert_eq!(
            form.value(SettingField::Location),
            &FieldValue::text("Set elsewhere")
        );
    }

    #[test]
    fn test_replace_baseline_clears_touched() {
        let mut form = form();
        form.set_field_input("weekends", "false").unwrap();
        assert!(form.is_dirty());

        let saved = StudioSettings {
            weekends: false,
            ..StudioSettings::default()
        };
        form.replace_baseline(&saved);
        assert!(!form.is_dirty());
        assert!(!form.is_touched(SettingField::Weekends));
        assert_eq!(form.baseline(), &saved);
    }
}
