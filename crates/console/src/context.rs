//! Session-scoped studio state.
//!
//! The context owns the settings store client and the last persisted
//! settings record. Settings sessions read the record through it and write
//! back only through [`StudioContext::apply_update`].

use std::sync::Arc;
use std::time::Duration;

use domain::models::SettingsRecord;
use domain::services::{SettingsApi, SyncError, DEFAULT_AUTO_HIDE};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::ConsoleError;
use crate::services::HttpSettingsApi;
use crate::session::SettingsSession;

/// Options applied to every settings session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// How long save banners stay open.
    pub auto_hide: Duration,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            auto_hide: DEFAULT_AUTO_HIDE,
        }
    }
}

impl From<&Config> for ContextOptions {
    fn from(config: &Config) -> Self {
        Self {
            auto_hide: config.notifications.auto_hide(),
        }
    }
}

pub struct StudioContext {
    api: Arc<dyn SettingsApi>,
    options: ContextOptions,
    settings: RwLock<Option<SettingsRecord>>,
}

impl StudioContext {
    pub fn new(api: Arc<dyn SettingsApi>, options: ContextOptions) -> Self {
        Self {
            api,
            options,
            settings: RwLock::new(None),
        }
    }

    /// Context backed by the HTTP settings API described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConsoleError> {
        config.validate()?;
        let api = HttpSettingsApi::new(&config.api)?;
        Ok(Self::new(Arc::new(api), ContextOptions::from(config)))
    }

    /// Context configured from files and environment, see [`Config::load`].
    pub fn from_env() -> Result<Self, ConsoleError> {
        let config = Config::load()?;
        Self::from_config(&config)
    }

    pub fn api(&self) -> &Arc<dyn SettingsApi> {
        &self.api
    }

    pub fn options(&self) -> ContextOptions {
        self.options
    }

    /// Last persisted record, if loaded.
    pub async fn settings(&self) -> Option<SettingsRecord> {
        self.settings.read().await.clone()
    }

    /// Returns the cached record, fetching it on first use.
    pub async fn load_settings(&self) -> Result<SettingsRecord, SyncError> {
        if let Some(record) = self.settings().await {
            return Ok(record);
        }

        let mut cached = self.settings.write().await;
        if let Some(record) = cached.as_ref() {
            return Ok(record.clone());
        }

        let record = self.api.fetch_settings().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to load studio settings");
            e
        })?;
        tracing::info!(settings_id = %record.id, "Loaded studio settings");
        *cached = Some(record.clone());
        Ok(record)
    }

    /// Replaces the cached record with one the store has persisted.
    pub async fn apply_update(&self, record: SettingsRecord) {
        tracing::debug!(settings_id = %record.id, "Applying settings update");
        *self.settings.write().await = Some(record);
    }

    /// Starts an editing session over the current record.
    pub async fn open_settings(self: &Arc<Self>) -> Result<SettingsSession, SyncError> {
        let record = self.load_settings().await?;
        Ok(SettingsSession::new(Arc::clone(self), record))
    }
}

impl std::fmt::Debug for StudioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioContext")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{SettingsId, StudioSettings};
    use domain::services::MockSettingsApi;

    fn record() -> SettingsRecord {
        SettingsRecord {
            id: SettingsId(5),
            settings: StudioSettings::default(),
        }
    }

    #[tokio::test]
    async fn test_load_settings_fetches_once() {
        let api = Arc::new(MockSettingsApi::new(record()));
        let context = StudioContext::new(api.clone(), ContextOptions::default());

        assert!(context.settings().await.is_none());
        assert_eq!(context.load_settings().await.unwrap(), record());
        assert_eq!(context.load_settings().await.unwrap(), record());
        assert_eq!(api.fetch_count().await, 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let api = Arc::new(MockSettingsApi::failing(record()));
        let context = StudioContext::new(api.clone(), ContextOptions::default());

        assert!(context.load_settings().await.is_err());
        assert!(context.settings().await.is_none());
        assert!(context.load_settings().await.is_err());
        assert_eq!(api.fetch_count().await, 2);
    }

    #[tokio::test]
    async fn test_apply_update_replaces_record() {
        let context = StudioContext::new(
            Arc::new(MockSettingsApi::new(record())),
            ContextOptions::default(),
        );
        let updated = SettingsRecord {
            id: SettingsId(5),
            settings: StudioSettings {
                weekends: false,
                ..StudioSettings::default()
            },
        };
        context.apply_update(updated.clone()).await;
        assert_eq!(context.settings().await, Some(updated.clone()));
        assert_eq!(context.load_settings().await.unwrap(), updated);
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = Config::load_for_test(&[("api.base_url", "")]).unwrap();
        assert!(matches!(
            StudioContext::from_config(&config),
            Err(ConsoleError::InvalidConfig(_))
        ));

        let config = Config::load_for_test(&[("notifications.auto_hide_ms", "2500")]).unwrap();
        let context = StudioContext::from_config(&config).unwrap();
        assert_eq!(context.options().auto_hide, Duration::from_millis(2500));
    }
}
