use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the studio API, without trailing slash
    pub base_url: String,

    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token sent with every settings request
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_auto_hide_ms")]
    pub auto_hide_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            auto_hide_ms: default_auto_hide_ms(),
        }
    }
}

impl NotificationsConfig {
    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_api_timeout_ms() -> u64 {
    10_000
}
fn default_auto_hide_ms() -> u64 {
    6000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. `.env` file, if present, exported into the environment
    /// 2. config/default.toml - base configuration with defaults
    /// 3. config/local.toml - local overrides (optional, not in git)
    /// 4. Environment variables with STUDIO__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("STUDIO").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from embedded defaults plus `overrides`.
    ///
    /// Does not touch the file system or the environment and skips
    /// validation, so tests can build partial configs.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [api]
            base_url = "http://127.0.0.1:3000/api"
            timeout_ms = 2000

            [notifications]
            auto_hide_ms = 6000

            [logging]
            level = "info"
            format = "json"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "STUDIO__API__BASE_URL environment variable must be set".to_string(),
            ));
        }

        if self.api.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "api.timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.notifications.auto_hide_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "notifications.auto_hide_ms cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.api.base_url, "http://127.0.0.1:3000/api");
        assert_eq!(config.request_timeout(), Duration::from_millis(2000));
        assert!(config.api.auth_token.is_none());
        assert_eq!(config.notifications.auto_hide(), Duration::from_millis(6000));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::load_for_test(&[
            ("api.base_url", "https://studio.example.com/api"),
            ("api.auth_token", "secret"),
            ("notifications.auto_hide_ms", "1500"),
            ("logging.level", "debug"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.api.base_url, "https://studio.example.com/api");
        assert_eq!(config.api.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.notifications.auto_hide_ms, 1500);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_validation_missing_base_url() {
        let config = Config::load_for_test(&[("api.base_url", "")]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("STUDIO__API__BASE_URL"));
    }

    #[test]
    fn test_config_validation_zero_auto_hide() {
        let config = Config::load_for_test(&[("notifications.auto_hide_ms", "0")])
            .expect("Failed to load config");

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("auto_hide_ms"));
    }
}
