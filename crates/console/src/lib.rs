//! Studio console settings screen.
//!
//! Wires the domain form engine to configuration, logging and the studio
//! HTTP API, and drives the submit cycle of a settings session.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod services;
pub mod session;

pub use context::{ContextOptions, StudioContext};
pub use error::ConsoleError;
pub use session::{SettingsSession, SubmitError, SubmitTicket};
