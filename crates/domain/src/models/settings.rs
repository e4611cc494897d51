//! Studio settings domain models.
//!
//! One settings resource exists per studio. The console fetches it once per
//! session, edits it as a form and writes it back as a single atomic update.

use serde::{Deserialize, Serialize};
use validator::Validate;

use thiserror::Error;

/// Identifier of the remote settings resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsId(pub i64);

impl std::fmt::Display for SettingsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// View the calendar opens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarView {
    #[serde(rename = "dayGridMonth")]
    Month,
    #[serde(rename = "timeGridWeek")]
    Week,
    #[serde(rename = "timeGridDay")]
    Day,
}

impl CalendarView {
    pub const TOKENS: [&'static str; 3] = ["dayGridMonth", "timeGridWeek", "timeGridDay"];

    pub fn as_str(self) -> &'static str {
        match self {
            CalendarView::Month => "dayGridMonth",
            CalendarView::Week => "timeGridWeek",
            CalendarView::Day => "timeGridDay",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalendarView::Month => "Month",
            CalendarView::Week => "Week",
            CalendarView::Day => "Day",
        }
    }
}

impl std::fmt::Display for CalendarView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole hour shown as the first or last row of the calendar grid.
///
/// Serialized as an `"HH:00"` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayTime(u8);

lazy_static::lazy_static! {
    static ref DISPLAY_TIME_REGEX: regex::Regex =
        regex::Regex::new(r"^([01]\d|2[0-3]):00$").unwrap();
}

impl DisplayTime {
    pub const TOKENS: [&'static str; 24] = [
        "00:00", "01:00", "02:00", "03:00", "04:00", "05:00", "06:00", "07:00", "08:00", "09:00",
        "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00",
        "20:00", "21:00", "22:00", "23:00",
    ];

    /// Returns `None` unless `hour` is in `0..24`.
    pub fn from_hour(hour: u8) -> Option<Self> {
        (hour < 24).then_some(Self(hour))
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    pub fn as_str(self) -> &'static str {
        Self::TOKENS[usize::from(self.0)]
    }

    /// Twelve-hour label, e.g. `"12 am"` or `"5 pm"`.
    pub fn label(self) -> String {
        let suffix = if self.0 < 12 { "am" } else { "pm" };
        let hour = match self.0 % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour} {suffix}")
    }

    /// All 24 values in order.
    pub fn all() -> impl Iterator<Item = DisplayTime> {
        (0..24).map(DisplayTime)
    }
}

/// Token that is not a whole hour in `"HH:00"` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid display time: {0}")]
pub struct InvalidDisplayTime(pub String);

impl std::str::FromStr for DisplayTime {
    type Err = InvalidDisplayTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = DISPLAY_TIME_REGEX
            .captures(s)
            .ok_or_else(|| InvalidDisplayTime(s.to_string()))?;
        captures[1]
            .parse::<u8>()
            .map(DisplayTime)
            .map_err(|_| InvalidDisplayTime(s.to_string()))
    }
}

impl TryFrom<String> for DisplayTime {
    type Error = InvalidDisplayTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DisplayTime> for String {
    fn from(value: DisplayTime) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, natively typed settings as persisted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudioSettings {
    /// Used when creating new students
    #[validate(range(
        min = 0.0,
        exclusive_max = 1000.0,
        message = "Lesson price must be under 1000"
    ))]
    pub default_lesson_price: f64,
    /// Minutes, used when creating new events
    #[validate(range(min = 0, max = 479, message = "Lesson duration must be 0-479 minutes"))]
    pub default_lesson_duration: i64,
    pub location: Option<String>,
    pub students_can_edit_profile: bool,
    pub cancellation_policy_summary: Option<String>,
    pub permit_cancellations: bool,
    /// Hours before a lesson
    #[validate(range(min = 0, max = 168, message = "Cancellation deadline must be 0-168 hours"))]
    pub cancellation_deadline: i64,
    pub permit_make_up_credits: bool,
    pub expire_make_up_credits: bool,
    /// Days
    #[validate(range(min = 0, max = 365, message = "Credit lifespan must be 0-365 days"))]
    pub max_credit_age: i64,
    pub limit_total_make_up_credits: bool,
    #[validate(range(min = 0, max = 50, message = "Accrued credits must be 0-50"))]
    pub max_total_make_up_credits: i64,
    pub issue_make_up_credit_before_deadline: bool,
    pub initial_view: CalendarView,
    pub slot_min_time: DisplayTime,
    pub slot_max_time: DisplayTime,
    pub weekends: bool,
    /// `true` makes new events public
    pub default_event_visibility: bool,
    pub permit_event_registration: bool,
    /// Hours before an event
    #[validate(range(
        min = 0,
        max = 168,
        message = "Registration deadline must be 0-168 hours"
    ))]
    pub event_registration_deadline: i64,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            default_lesson_price: 50.0,
            default_lesson_duration: 30,
            location: None,
            students_can_edit_profile: true,
            cancellation_policy_summary: None,
            permit_cancellations: true,
            cancellation_deadline: 24,
            permit_make_up_credits: true,
            expire_make_up_credits: false,
            max_credit_age: 90,
            limit_total_make_up_credits: false,
            max_total_make_up_credits: 5,
            issue_make_up_credit_before_deadline: true,
            initial_view: CalendarView::Week,
            slot_min_time: DisplayTime(8),
            slot_max_time: DisplayTime(20),
            weekends: true,
            default_event_visibility: true,
            permit_event_registration: false,
            event_registration_deadline: 48,
        }
    }
}

/// Settings together with the identifier of their remote resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub id: SettingsId,
    pub settings: StudioSettings,
}

/// Update request body: `{ id, ...castValues }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsPayload {
    pub id: SettingsId,
    #[serde(flatten)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

impl SettingsPayload {
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    /// Decodes the cast values into typed settings.
    pub fn to_settings(&self) -> Result<StudioSettings, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.values.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_time_tokens() {
        assert_eq!(DisplayTime::all().count(), 24);
        for (time, token) in DisplayTime::all().zip(DisplayTime::TOKENS) {
            assert_eq!(time.as_str(), token);
            assert_eq!(token.parse::<DisplayTime>().unwrap(), time);
        }
    }

    #[test]
    fn test_display_time_labels() {
        assert_eq!(DisplayTime::from_hour(0).unwrap().label(), "12 am");
        assert_eq!(DisplayTime::from_hour(9).unwrap().label(), "9 am");
        assert_eq!(DisplayTime::from_hour(12).unwrap().label(), "12 pm");
        assert_eq!(DisplayTime::from_hour(23).unwrap().label(), "11 pm");
        assert!(DisplayTime::from_hour(24).is_none());
    }

    #[test]
    fn test_display_time_rejects_half_hours() {
        let err = "08:30".parse::<DisplayTime>().unwrap_err();
        assert_eq!(err, InvalidDisplayTime("08:30".to_string()));
        assert_eq!(err.to_string(), "Invalid display time: 08:30");
        assert!("24:00".parse::<DisplayTime>().is_err());
        assert!("8:00".parse::<DisplayTime>().is_err());
    }

    #[test]
    fn test_display_time_decode_error_names_token() {
        let err = serde_json::from_value::<DisplayTime>(json!("25:00")).unwrap_err();
        assert!(err.to_string().contains("Invalid display time: 25:00"));
    }

    #[test]
    fn test_calendar_view_serialization() {
        assert_eq!(serde_json::to_value(CalendarView::Month).unwrap(), json!("dayGridMonth"));
        let view: CalendarView = serde_json::from_value(json!("timeGridDay")).unwrap();
        assert_eq!(view, CalendarView::Day);
        assert_eq!(view.label(), "Day");
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let json = serde_json::to_value(StudioSettings::default()).unwrap();
        assert_eq!(json["permitMakeUpCredits"], json!(true));
        assert_eq!(json["issueMakeUpCreditBeforeDeadline"], json!(true));
        assert_eq!(json["maxTotalMakeUpCredits"], json!(5));
        assert_eq!(json["slotMinTime"], json!("08:00"));
        assert_eq!(json["location"], json!(null));
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(StudioSettings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_validation_rejects_out_of_range() {
        let settings = StudioSettings {
            max_credit_age: 400,
            ..StudioSettings::default()
        };
        let errors = settings.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("max_credit_age"));
    }

    #[test]
    fn test_payload_flattens_values() {
        let mut values = serde_json::Map::new();
        values.insert("weekends".to_string(), json!(false));
        let payload = SettingsPayload {
            id: SettingsId(7),
            values,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, json!({"id": 7, "weekends": false}));
    }
}
