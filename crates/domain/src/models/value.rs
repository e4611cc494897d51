//! In-progress form values.

use std::collections::BTreeMap;

use serde_json::Value;

use super::field::SettingField;
use super::settings::StudioSettings;

/// Stand-in for a field missing from [`FormValues`].
pub static NULL_VALUE: FieldValue = FieldValue::Null;

/// Value held by a form control.
///
/// Numeric inputs keep the text the user typed until submit casts it;
/// booleans are always native.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Boolean reading of the value. The radio tokens `"true"` and `"false"`
    /// count as booleans.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            FieldValue::Text(text) => shared::validation::parse_bool_token(text).ok(),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        self.as_bool() == Some(true)
    }

    /// Converts a JSON value received from the API.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Null),
            Value::String(text) => FieldValue::Text(text.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    /// Text shown in the form control.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(flag) => flag.to_string(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Current value of every settings field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues(BTreeMap<SettingField, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a persisted record. Every declared field is present.
    pub fn from_settings(settings: &StudioSettings) -> Self {
        let json = serde_json::to_value(settings).unwrap_or(Value::Null);
        SettingField::ALL
            .into_iter()
            .map(|field| {
                let value = json
                    .get(field.as_str())
                    .map(FieldValue::from_json)
                    .unwrap_or(FieldValue::Null);
                (field, value)
            })
            .collect()
    }

    pub fn get(&self, field: SettingField) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    /// Returns the previous value.
    pub fn insert(&mut self, field: SettingField, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(field, value)
    }

    /// Whether `field` currently reads as `true`.
    pub fn is_true(&self, field: SettingField) -> bool {
        self.get(field).is_some_and(FieldValue::is_true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingField, &FieldValue)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SettingField, FieldValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (SettingField, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
