//! Domain models for the studio console.

pub mod field;
pub mod settings;
pub mod value;

pub use field::{
    ChoiceRule, FieldKind, NumericRule, SettingField, SettingsSection, ToggleLabels, UnknownField,
};
pub use settings::{
    CalendarView, DisplayTime, InvalidDisplayTime, SettingsId, SettingsPayload, SettingsRecord,
    StudioSettings,
};
pub use value::{FieldValue, FormValues, NULL_VALUE};
