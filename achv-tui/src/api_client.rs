//! HTTP client for the progress lookup backend.

use crate::config::TuiConfig;
use achv_core::{ErrorPayload, Identity, LookupPayload, Realm, Region};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest slice of a raw response body quoted in an error message.
const BODY_EXCERPT_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status. `message` is the backend's `error` field when the
    /// body carried one, otherwise an excerpt of the raw body.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// The two backend calls the client depends on.
#[async_trait]
pub trait ProgressBackend: Send + Sync {
    /// Resolve a character's progress tree, or the backend's error payload.
    async fn lookup(&self, identity: &Identity) -> Result<LookupPayload, ApiClientError>;

    /// List the realms of a region, in backend order.
    async fn realms(&self, region: Region) -> Result<Vec<Realm>, ApiClientError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiClientError::Config("api_base_url is empty".to_string()));
        }
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(path, status, bytes = body.len(), "Backend response");
        decode_body(status, &body)
    }
}

#[async_trait]
impl ProgressBackend for RestClient {
    async fn lookup(&self, identity: &Identity) -> Result<LookupPayload, ApiClientError> {
        let query = [
            ("region", identity.region()),
            ("server", identity.realm()),
            ("character", identity.character()),
        ];
        self.get_json("/achievement", &query).await
    }

    async fn realms(&self, region: Region) -> Result<Vec<Realm>, ApiClientError> {
        self.get_json("/realms", &[("region", region.as_str())])
            .await
    }
}

/// Decode a response body according to its status.
///
/// A non-success status carrying an `{ "error": ... }` body is decoded as
/// that payload when `T` can hold it (the backend answers an unknown
/// character with 404 and an error object). Any other non-success response
/// is a [`ApiClientError::Status`].
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiClientError> {
    if !(200..300).contains(&status) {
        let message = match serde_json::from_str::<ErrorPayload>(body) {
            Ok(payload) => match serde_json::from_str::<T>(body) {
                Ok(decoded) => return Ok(decoded),
                Err(_) => payload.error,
            },
            Err(_) => excerpt(body),
        };
        return Err(ApiClientError::Status { status, message });
    }
    serde_json::from_str(body).map_err(|err| {
        ApiClientError::InvalidResponse(format!("malformed payload ({}): {}", err, excerpt(body)))
    })
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
