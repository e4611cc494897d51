//! Common validation utilities.
//!
//! Every helper returns a [`ValidationError`] whose `code` classifies the
//! failure (see the `*_CODE` constants) and whose `message` is the text shown
//! next to the offending field.

use std::borrow::Cow;

use validator::ValidationError;

/// Value lies outside its declared bounds.
pub const RANGE_CODE: &str = "range";

/// Value is numeric but not a whole number.
pub const INTEGER_CODE: &str = "integer";

/// Value could not be read as a number at all.
pub const NUMBER_CODE: &str = "number";

/// Value is not one of the allowed tokens.
pub const ENUM_CODE: &str = "enum";

/// Value could not be read as a boolean.
pub const BOOLEAN_CODE: &str = "boolean";

/// Message for integer-constrained fields holding a fraction.
pub const WHOLE_NUMBER_MESSAGE: &str = "Please use a whole number";

/// Message for numeric fields holding something that is not a number.
pub const NOT_A_NUMBER_MESSAGE: &str = "Must be a number";

/// Message for boolean fields holding something other than true/false.
pub const NOT_A_BOOLEAN_MESSAGE: &str = "Must be yes or no";

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validates that `value` lies within the inclusive range `[min, max]`.
///
/// `below` is reported when the value is under `min`, `above` when it is
/// over `max`.
pub fn validate_bounds(
    value: f64,
    min: f64,
    max: f64,
    below: &'static str,
    above: &'static str,
) -> Result<(), ValidationError> {
    let message = if value < min {
        below
    } else if value > max {
        above
    } else {
        return Ok(());
    };

    let mut err = error(RANGE_CODE, message);
    err.add_param(Cow::Borrowed("min"), &min);
    err.add_param(Cow::Borrowed("max"), &max);
    err.add_param(Cow::Borrowed("value"), &value);
    Err(err)
}

/// Validates that `value` lies within the half-open range `[min, limit)`.
///
/// Same reporting as [`validate_bounds`], except that `limit` itself is
/// rejected.
pub fn validate_below(
    value: f64,
    min: f64,
    limit: f64,
    below: &'static str,
    above: &'static str,
) -> Result<(), ValidationError> {
    let message = if value < min {
        below
    } else if value >= limit {
        above
    } else {
        return Ok(());
    };

    let mut err = error(RANGE_CODE, message);
    err.add_param(Cow::Borrowed("min"), &min);
    err.add_param(Cow::Borrowed("exclusive_max"), &limit);
    err.add_param(Cow::Borrowed("value"), &value);
    Err(err)
}

/// Validates that `value` has no fractional part.
pub fn validate_whole_number(value: f64) -> Result<(), ValidationError> {
    if value.fract() == 0.0 {
        Ok(())
    } else {
        let mut err = error(INTEGER_CODE, WHOLE_NUMBER_MESSAGE);
        err.add_param(Cow::Borrowed("value"), &value);
        Err(err)
    }
}

/// Validates that `value` is one of `allowed`.
pub fn validate_member(
    value: &str,
    allowed: &[&str],
    message: &'static str,
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        let mut err = error(ENUM_CODE, message);
        err.add_param(Cow::Borrowed("value"), &value);
        Err(err)
    }
}

/// Parses user-entered text as a finite number.
///
/// Surrounding whitespace is ignored. Empty input, `NaN` and infinities are
/// rejected.
pub fn parse_number(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            let mut err = error(NUMBER_CODE, NOT_A_NUMBER_MESSAGE);
            err.add_param(Cow::Borrowed("value"), &raw);
            Err(err)
        }
    }
}

/// Parses the `"true"` / `"false"` tokens used by radio controls.
pub fn parse_bool_token(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => {
            let mut err = error(BOOLEAN_CODE, NOT_A_BOOLEAN_MESSAGE);
            err.add_param(Cow::Borrowed("value"), &raw);
            Err(err)
        }
    }
}
