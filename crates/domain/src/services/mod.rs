//! Domain services for the studio console.
//!
//! Services contain the form logic that operates on domain models.

pub mod form;
pub mod notification;
pub mod settings_sync;
pub mod validation;
pub mod visibility;

pub use form::{InputError, SettingsForm};
pub use notification::{CloseReason, NotificationCenter, NotificationKind, DEFAULT_AUTO_HIDE};
pub use settings_sync::{MockSettingsApi, SettingsApi, SyncError};
pub use validation::{validate_field, validate_values, FieldError, ValidationReport};
pub use visibility::{
    resolve_active_fields, ActiveFields, DependencyRule, DependencyTable, DependencyTableError,
    MAX_DEPENDENCY_DEPTH, SETTINGS_DEPENDENCIES,
};
