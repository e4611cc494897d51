//! Settings store client over the studio HTTP API.
//!
//! `GET {base_url}/settings` returns the record, `PUT {base_url}/settings`
//! sends the flat update payload. Both answer with the resource envelope
//! `{ "data": { "id": …, "attributes": { … } } }`.

use std::time::Duration;

use domain::models::{SettingsId, SettingsPayload, SettingsRecord, StudioSettings};
use domain::services::{SettingsApi, SyncError};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;

use crate::config::ApiConfig;

/// Settings API client using reqwest.
pub struct HttpSettingsApi {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct SettingsEnvelope {
    data: SettingsResource,
}

#[derive(Debug, Deserialize)]
struct SettingsResource {
    id: ResourceId,
    attributes: StudioSettings,
}

/// Resource ids arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResourceId {
    Number(i64),
    Text(String),
}

impl TryFrom<ResourceId> for SettingsId {
    type Error = SyncError;

    fn try_from(id: ResourceId) -> Result<Self, Self::Error> {
        match id {
            ResourceId::Number(id) => Ok(SettingsId(id)),
            ResourceId::Text(text) => text
                .parse()
                .map(SettingsId)
                .map_err(|_| SyncError::Decode(format!("Invalid settings id: {}", text))),
        }
    }
}

impl HttpSettingsApi {
    /// Create a new client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config
                .auth_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            timeout_ms: config.timeout_ms,
        })
    }

    fn settings_url(&self) -> String {
        format!("{}/settings", self.base_url)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.client.request(method, self.settings_url());
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Transport(format!("Request timeout after {}ms", self.timeout_ms))
        } else {
            SyncError::Transport(err.to_string())
        }
    }

    async fn read_record(&self, response: Response) -> Result<SettingsRecord, SyncError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        decode_record(&bytes)
    }
}

/// Normalizes a resource envelope into a [`SettingsRecord`].
pub fn decode_record(body: &[u8]) -> Result<SettingsRecord, SyncError> {
    let envelope: SettingsEnvelope =
        serde_json::from_slice(body).map_err(|e| SyncError::Decode(e.to_string()))?;
    Ok(SettingsRecord {
        id: envelope.data.id.try_into()?,
        settings: envelope.data.attributes,
    })
}

#[async_trait::async_trait]
impl SettingsApi for HttpSettingsApi {
    async fn fetch_settings(&self) -> Result<SettingsRecord, SyncError> {
        tracing::debug!(url = %self.settings_url(), "Fetching settings");

        let response = self
            .request(Method::GET)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_record(response).await
    }

    async fn update_settings(&self, payload: SettingsPayload) -> Result<SettingsRecord, SyncError> {
        tracing::debug!(
            url = %self.settings_url(),
            settings_id = %payload.id,
            "Updating settings"
        );

        let response = self
            .request(Method::PUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_record(response).await
    }
}
