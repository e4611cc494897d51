//! Common test utilities for integration tests.
//!
//! Provides settings fixtures and configuration helpers.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use std::sync::Arc;

use domain::models::{SettingsId, SettingsRecord, StudioSettings};
use domain::services::MockSettingsApi;
use studio_console::config::Config;
use studio_console::{ContextOptions, StudioContext};
use tokio::net::TcpListener;

pub const SETTINGS_ID: SettingsId = SettingsId(42);

/// A studio with every optional policy switched on.
pub fn sample_settings() -> StudioSettings {
    StudioSettings {
        location: Some("Main Street Studio".to_string()),
        cancellation_policy_summary: Some("Cancel 24 hours ahead for a credit.".to_string()),
        expire_make_up_credits: true,
        limit_total_make_up_credits: true,
        permit_event_registration: true,
        ..StudioSettings::default()
    }
}

pub fn sample_record() -> SettingsRecord {
    SettingsRecord {
        id: SETTINGS_ID,
        settings: sample_settings(),
    }
}

/// Context over a shared mock so tests can inspect what it received.
pub fn mock_context(api: Arc<MockSettingsApi>) -> Arc<StudioContext> {
    Arc::new(StudioContext::new(api, ContextOptions::default()))
}

/// Resource envelope the studio API answers with.
pub fn envelope(record: &SettingsRecord) -> String {
    serde_json::json!({
        "data": {
            "id": record.id.0.to_string(),
            "type": "settings",
            "attributes": record.settings,
        }
    })
    .to_string()
}

/// Configuration pointing the console at `base_url`.
pub fn config_for(base_url: &str, overrides: &[(&str, &str)]) -> Config {
    let mut all = vec![("api.base_url", base_url)];
    all.extend_from_slice(overrides);
    Config::load_for_test(&all).expect("Failed to load config")
}

/// URL of a port nothing listens on.
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No address");
    drop(listener);
    format!("http://{}/api", addr)
}
