//! Domain layer for the studio console.
//!
//! This crate contains:
//! - Domain models (settings record, field schema, form values)
//! - Form services (validation, visibility, form state, notifications)
//! - The settings store boundary and its mock

pub mod models;
pub mod services;
