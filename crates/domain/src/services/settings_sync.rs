//! Remote settings store boundary.
//!
//! The console reads the settings record once per session and writes it back
//! as a single atomic update. The store returns the canonical persisted
//! record; callers never derive it themselves.

use tokio::sync::Mutex;

use crate::models::{SettingsPayload, SettingsRecord};

/// Failure talking to the settings store.
///
/// Callers surface every variant the same way; the variants exist for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Settings request failed: {0}")]
    Transport(String),

    #[error("Settings API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid settings response: {0}")]
    Decode(String),

    #[error("Settings update rejected: {0}")]
    Remote(String),
}

/// Settings store operations.
#[async_trait::async_trait]
pub trait SettingsApi: Send + Sync {
    /// Fetch the studio's settings record.
    async fn fetch_settings(&self) -> Result<SettingsRecord, SyncError>;

    /// Persist `payload` and return the stored record.
    async fn update_settings(&self, payload: SettingsPayload) -> Result<SettingsRecord, SyncError>;
}

#[derive(Debug)]
struct MockState {
    record: SettingsRecord,
    payloads: Vec<SettingsPayload>,
    fetches: usize,
}

/// In-memory settings store for development and testing.
///
/// Records every update payload it receives.
#[derive(Debug)]
pub struct MockSettingsApi {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    state: Mutex<MockState>,
}

impl MockSettingsApi {
    pub fn new(record: SettingsRecord) -> Self {
        Self {
            simulate_failure: false,
            state: Mutex::new(MockState {
                record,
                payloads: Vec::new(),
                fetches: 0,
            }),
        }
    }

    /// Create a mock store that rejects every request.
    pub fn failing(record: SettingsRecord) -> Self {
        Self {
            simulate_failure: true,
            ..Self::new(record)
        }
    }

    /// Update payloads received so far, oldest first.
    pub async fn payloads(&self) -> Vec<SettingsPayload> {
        self.state.lock().await.payloads.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.state.lock().await.fetches
    }

    /// Record currently stored.
    pub async fn record(&self) -> SettingsRecord {
        self.state.lock().await.record.clone()
    }
}

#[async_trait::async_trait]
impl SettingsApi for MockSettingsApi {
    async fn fetch_settings(&self) -> Result<SettingsRecord, SyncError> {
        let mut state = self.state.lock().await;
        state.fetches += 1;

        if self.simulate_failure {
            tracing::warn!("Mock settings API simulating fetch failure");
            return Err(SyncError::Transport("Simulated failure".to_string()));
        }

        tracing::info!(settings_id = %state.record.id, "Mock: returning settings");
        Ok(state.record.clone())
    }

    async fn update_settings(&self, payload: SettingsPayload) -> Result<SettingsRecord, SyncError> {
        let mut state = self.state.lock().await;
        state.payloads.push(payload.clone());

        if self.simulate_failure {
            tracing::warn!(
                settings_id = %payload.id,
                "Mock settings API simulating update failure"
            );
            return Err(SyncError::Remote("Simulated failure".to_string()));
        }

        let settings = payload
            .to_settings()
            .map_err(|e| SyncError::Remote(e.to_string()))?;
        state.record = SettingsRecord {
            id: payload.id,
            settings,
        };

        tracing::info!(
            settings_id = %payload.id,
            fields = payload.values.len(),
            "Mock: stored settings update"
        );
        Ok(state.record.clone())
    }
}
