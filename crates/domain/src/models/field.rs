//! Settings field schema.
//!
//! Every editable setting is a [`SettingField`]. Its [`FieldKind`] carries the
//! declarative rule the validator enforces and the cast the submit path
//! applies.

use serde::{Deserialize, Serialize};

use super::settings::{CalendarView, DisplayTime};

/// Message for numeric values under their minimum.
pub const POSITIVE_NUMBER_MESSAGE: &str = "Must be a positive number";

/// Message for text fields holding a non-text value.
pub const NOT_TEXT_MESSAGE: &str = "Must be text";

/// Screen section a field is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSection {
    Studio,
    CancellationPolicy,
    Calendar,
}

impl SettingsSection {
    pub fn title(self) -> &'static str {
        match self {
            SettingsSection::Studio => "Studio Settings",
            SettingsSection::CancellationPolicy => "Cancellation Policy",
            SettingsSection::Calendar => "Calendar Settings",
        }
    }
}

impl std::fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsSection::Studio => write!(f, "studio"),
            SettingsSection::CancellationPolicy => write!(f, "cancellation_policy"),
            SettingsSection::Calendar => write!(f, "calendar"),
        }
    }
}

/// Numeric bounds, optionally restricted to whole numbers.
///
/// `min` is always inclusive. `max` is inclusive unless `max_exclusive` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRule {
    pub min: f64,
    pub max: f64,
    pub max_exclusive: bool,
    pub integer: bool,
    pub below_message: &'static str,
    pub above_message: &'static str,
}

impl NumericRule {
    const fn whole(max: f64, above_message: &'static str) -> Self {
        Self {
            min: 0.0,
            max,
            max_exclusive: false,
            integer: true,
            below_message: POSITIVE_NUMBER_MESSAGE,
            above_message,
        }
    }

    /// Whether `value` satisfies the bounds and the integrality constraint.
    pub fn accepts(&self, value: f64) -> bool {
        let under_max = if self.max_exclusive {
            value < self.max
        } else {
            value <= self.max
        };
        value >= self.min && under_max && (!self.integer || value.fract() == 0.0)
    }
}

/// A closed set of string tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceRule {
    pub options: &'static [&'static str],
    pub message: &'static str,
}

/// Labels rendered on the two radio buttons of a boolean field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleLabels {
    pub on: &'static str,
    pub off: &'static str,
}

const YES_NO: ToggleLabels = ToggleLabels {
    on: "Yes",
    off: "No",
};

/// Declared type and rule of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number(NumericRule),
    Boolean(ToggleLabels),
    Choice(ChoiceRule),
    /// Nullable free text without constraints.
    Text,
}

/// Unknown wire name passed at the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown settings field: {0}")]
pub struct UnknownField(pub String);

/// Every editable studio setting, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingField {
    DefaultLessonPrice,
    DefaultLessonDuration,
    Location,
    StudentsCanEditProfile,
    CancellationPolicySummary,
    PermitCancellations,
    CancellationDeadline,
    PermitMakeUpCredits,
    ExpireMakeUpCredits,
    MaxCreditAge,
    LimitTotalMakeUpCredits,
    MaxTotalMakeUpCredits,
    IssueMakeUpCreditBeforeDeadline,
    InitialView,
    SlotMinTime,
    SlotMaxTime,
    Weekends,
    DefaultEventVisibility,
    PermitEventRegistration,
    EventRegistrationDeadline,
}

impl SettingField {
    pub const ALL: [SettingField; 20] = [
        SettingField::DefaultLessonPrice,
        SettingField::DefaultLessonDuration,
        SettingField::Location,
        SettingField::StudentsCanEditProfile,
        SettingField::CancellationPolicySummary,
        SettingField::PermitCancellations,
        SettingField::CancellationDeadline,
        SettingField::PermitMakeUpCredits,
        SettingField::ExpireMakeUpCredits,
        SettingField::MaxCreditAge,
        SettingField::LimitTotalMakeUpCredits,
        SettingField::MaxTotalMakeUpCredits,
        SettingField::IssueMakeUpCreditBeforeDeadline,
        SettingField::InitialView,
        SettingField::SlotMinTime,
        SettingField::SlotMaxTime,
        SettingField::Weekends,
        SettingField::DefaultEventVisibility,
        SettingField::PermitEventRegistration,
        SettingField::EventRegistrationDeadline,
    ];

    /// Wire name used in API payloads and by form controls.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingField::DefaultLessonPrice => "defaultLessonPrice",
            SettingField::DefaultLessonDuration => "defaultLessonDuration",
            SettingField::Location => "location",
            SettingField::StudentsCanEditProfile => "studentsCanEditProfile",
            SettingField::CancellationPolicySummary => "cancellationPolicySummary",
            SettingField::PermitCancellations => "permitCancellations",
            SettingField::CancellationDeadline => "cancellationDeadline",
            SettingField::PermitMakeUpCredits => "permitMakeUpCredits",
            SettingField::ExpireMakeUpCredits => "expireMakeUpCredits",
            SettingField::MaxCreditAge => "maxCreditAge",
            SettingField::LimitTotalMakeUpCredits => "limitTotalMakeUpCredits",
            SettingField::MaxTotalMakeUpCredits => "maxTotalMakeUpCredits",
            SettingField::IssueMakeUpCreditBeforeDeadline => "issueMakeUpCreditBeforeDeadline",
            SettingField::InitialView => "initialView",
            SettingField::SlotMinTime => "slotMinTime",
            SettingField::SlotMaxTime => "slotMaxTime",
            SettingField::Weekends => "weekends",
            SettingField::DefaultEventVisibility => "defaultEventVisibility",
            SettingField::PermitEventRegistration => "permitEventRegistration",
            SettingField::EventRegistrationDeadline => "eventRegistrationDeadline",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingField::DefaultLessonPrice => "Default Lesson Price",
            SettingField::DefaultLessonDuration => "Default Lesson Duration",
            SettingField::Location => "Studio Location",
            SettingField::StudentsCanEditProfile => "Students Can Edit Their Profiles",
            SettingField::CancellationPolicySummary => "Cancellation Policy Summary",
            SettingField::PermitCancellations => "Allow Cancellations",
            SettingField::CancellationDeadline => "Cancellation Deadline",
            SettingField::PermitMakeUpCredits => "Allow Make-Up Credits",
            SettingField::ExpireMakeUpCredits => "Expire Make-Up Credits",
            SettingField::MaxCreditAge => "Make-Up Credit Lifespan",
            SettingField::LimitTotalMakeUpCredits => "Limit Accrued Make-Up Credits",
            SettingField::MaxTotalMakeUpCredits => "Max Accrued Make-Up Credits",
            SettingField::IssueMakeUpCreditBeforeDeadline => "Issue Make-Up Credits Automatically",
            SettingField::InitialView => "Default Calendar View",
            SettingField::SlotMinTime => "Calendar Display Start",
            SettingField::SlotMaxTime => "Calendar Display End",
            SettingField::Weekends => "Show Weekends",
            SettingField::DefaultEventVisibility => "Default Event Visibility",
            SettingField::PermitEventRegistration => "Allow Students to Register for Events",
            SettingField::EventRegistrationDeadline => "Event Registration Deadline",
        }
    }

    pub fn section(self) -> SettingsSection {
        match self {
            SettingField::DefaultLessonPrice
            | SettingField::DefaultLessonDuration
            | SettingField::Location
            | SettingField::StudentsCanEditProfile => SettingsSection::Studio,
            SettingField::CancellationPolicySummary
            | SettingField::PermitCancellations
            | SettingField::CancellationDeadline
            | SettingField::PermitMakeUpCredits
            | SettingField::ExpireMakeUpCredits
            | SettingField::MaxCreditAge
            | SettingField::LimitTotalMakeUpCredits
            | SettingField::MaxTotalMakeUpCredits
            | SettingField::IssueMakeUpCreditBeforeDeadline => SettingsSection::CancellationPolicy,
            SettingField::InitialView
            | SettingField::SlotMinTime
            | SettingField::SlotMaxTime
            | SettingField::Weekends
            | SettingField::DefaultEventVisibility
            | SettingField::PermitEventRegistration
            | SettingField::EventRegistrationDeadline => SettingsSection::Calendar,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SettingField::DefaultLessonPrice => FieldKind::Number(NumericRule {
                min: 0.0,
                max: 1000.0,
                max_exclusive: true,
                integer: false,
                below_message: POSITIVE_NUMBER_MESSAGE,
                above_message: "Whew. You're expensive. Must be less than 1000",
            }),
            SettingField::DefaultLessonDuration => {
                FieldKind::Number(NumericRule::whole(479.0, "Must be less than 480 minutes"))
            }
            SettingField::CancellationDeadline | SettingField::EventRegistrationDeadline => {
                FieldKind::Number(NumericRule::whole(168.0, "Must be less than 169"))
            }
            SettingField::MaxCreditAge => {
                FieldKind::Number(NumericRule::whole(365.0, "Must be less than 366"))
            }
            SettingField::MaxTotalMakeUpCredits => {
                FieldKind::Number(NumericRule::whole(50.0, "Must be less than 51"))
            }
            SettingField::Location | SettingField::CancellationPolicySummary => FieldKind::Text,
            SettingField::InitialView => FieldKind::Choice(ChoiceRule {
                options: &CalendarView::TOKENS,
                message: "Invalid selection",
            }),
            SettingField::SlotMinTime | SettingField::SlotMaxTime => {
                FieldKind::Choice(ChoiceRule {
                    options: &DisplayTime::TOKENS,
                    message: "Invalid time selection",
                })
            }
            SettingField::DefaultEventVisibility => FieldKind::Boolean(ToggleLabels {
                on: "Public",
                off: "Private",
            }),
            SettingField::StudentsCanEditProfile
            | SettingField::PermitCancellations
            | SettingField::PermitMakeUpCredits
            | SettingField::ExpireMakeUpCredits
            | SettingField::LimitTotalMakeUpCredits
            | SettingField::IssueMakeUpCreditBeforeDeadline
            | SettingField::Weekends
            | SettingField::PermitEventRegistration => FieldKind::Boolean(YES_NO),
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self.kind(), FieldKind::Boolean(_))
    }
}

impl std::fmt::Display for SettingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
