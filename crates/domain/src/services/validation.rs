//! Field-level schema validation.
//!
//! Rules come from [`SettingField::kind`]. No cross-field rule is evaluated
//! here; which fields matter is decided by the visibility resolver.

use std::collections::BTreeMap;

use shared::validation::{
    parse_bool_token, parse_number, validate_below, validate_bounds, validate_member,
    validate_whole_number, BOOLEAN_CODE, ENUM_CODE, NOT_A_BOOLEAN_MESSAGE, NOT_A_NUMBER_MESSAGE, RANGE_CODE,
};
use thiserror::Error;
use validator::ValidationError;

use crate::models::field::NOT_TEXT_MESSAGE;
use crate::models::{FieldKind, FieldValue, FormValues, SettingField, NULL_VALUE};

/// Why a single field failed validation. Displays as the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Numeric value outside its declared bounds.
    #[error("{0}")]
    Range(String),
    /// Value of the wrong type, including fractions in integer fields.
    #[error("{0}")]
    Type(String),
    /// Value not in the allowed set.
    #[error("{0}")]
    Enum(String),
}

impl FieldError {
    pub fn message(&self) -> &str {
        match self {
            FieldError::Range(message) | FieldError::Type(message) | FieldError::Enum(message) => {
                message
            }
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        match err.code.as_ref() {
            RANGE_CODE => FieldError::Range(message),
            ENUM_CODE => FieldError::Enum(message),
            _ => FieldError::Type(message),
        }
    }
}

/// Validates one value against the rule declared for `field`.
pub fn validate_field(field: SettingField, value: &FieldValue) -> Result<(), FieldError> {
    match field.kind() {
        FieldKind::Number(rule) => {
            let number = match value {
                FieldValue::Number(number) => *number,
                FieldValue::Text(text) => parse_number(text)?,
                FieldValue::Null | FieldValue::Bool(_) => {
                    return Err(FieldError::Type(NOT_A_NUMBER_MESSAGE.to_string()))
                }
            };
            if rule.max_exclusive {
                validate_below(
                    number,
                    rule.min,
                    rule.max,
                    rule.below_message,
                    rule.above_message,
                )?;
            } else {
                validate_bounds(
                    number,
                    rule.min,
                    rule.max,
                    rule.below_message,
                    rule.above_message,
                )?;
            }
            if rule.integer {
                validate_whole_number(number)?;
            }
            Ok(())
        }
        FieldKind::Boolean(_) => match value {
            FieldValue::Bool(_) => Ok(()),
            FieldValue::Text(text) => parse_bool_token(text).map(|_| ()).map_err(Into::into),
            FieldValue::Null | FieldValue::Number(_) => {
                let mut err = ValidationError::new(BOOLEAN_CODE);
                err.message = Some(NOT_A_BOOLEAN_MESSAGE.into());
                Err(err.into())
            }
        },
        FieldKind::Choice(rule) => match value {
            FieldValue::Text(text) => {
                validate_member(text, rule.options, rule.message).map_err(Into::into)
            }
            _ => Err(FieldError::Enum(rule.message.to_string())),
        },
        FieldKind::Text => match value {
            FieldValue::Null | FieldValue::Text(_) => Ok(()),
            _ => Err(FieldError::Type(NOT_TEXT_MESSAGE.to_string())),
        },
    }
}

/// Outcome of validating every declared field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    failures: BTreeMap<SettingField, FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self, field: SettingField) -> bool {
        !self.failures.contains_key(&field)
    }

    pub fn error(&self, field: SettingField) -> Option<&FieldError> {
        self.failures.get(&field)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = (SettingField, &FieldError)> {
        self.failures.iter().map(|(field, err)| (*field, err))
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validates every declared field of `values`.
///
/// A field missing from `values` is validated as `Null`.
pub fn validate_values(values: &FormValues) -> ValidationReport {
    let failures = SettingField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = values.get(field).unwrap_or(&NULL_VALUE);
            validate_field(field, value).err().map(|err| (field, err))
        })
        .collect();
    ValidationReport { failures }
}
