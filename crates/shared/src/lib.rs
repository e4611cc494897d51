//! Shared utilities for the studio console.
//!
//! This crate provides functionality used by the other crates:
//! - Field-rule helpers producing `validator::ValidationError`s
//! - Parsing of raw UI tokens into native values

pub mod validation;
