//! External service clients.

pub mod http_settings;

pub use http_settings::{decode_record, HttpSettingsApi};
