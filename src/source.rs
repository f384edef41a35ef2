//! Remote character lookup service

use async_trait::async_trait;
use tracing::debug;

use crate::character::RawCharacter;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};

/// Anything that can produce one random character record per call
#[async_trait]
pub trait CharacterSource: Send + Sync {
    async fn fetch_random(&self) -> GalleryResult<RawCharacter>;
}

/// HTTP client for the public character API
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(config: &GalleryConfig) -> GalleryResult<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CharacterSource for HttpSource {
    async fn fetch_random(&self) -> GalleryResult<RawCharacter> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, endpoint = %self.endpoint, "character request rejected");
            return Err(GalleryError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_record(&body)
    }
}

/// Decode one response body. Only a body that is not JSON fails; any JSON
/// value that is not an object reads as an empty record.
pub fn parse_record(body: &[u8]) -> GalleryResult<RawCharacter> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| GalleryError::Decode(e.to_string()))?;

    if !value.is_object() {
        debug!("character response is not an object, using defaults");
        return Ok(RawCharacter::default());
    }

    serde_json::from_value(value).map_err(|e| GalleryError::Decode(e.to_string()))
}
