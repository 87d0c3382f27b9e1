use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::error::HandlerError;
use crate::handlers::Handler;
use crate::platform::CanonicalMessage;

/// Longest slice of a sink's error body kept for the logs, in characters.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Forwards each message as a JSON POST to a downstream URL.
pub struct HttpHandler {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpHandler {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = reqwest::Url::parse(url)
            .with_context(|| format!("Invalid forwarding URL: {}", url))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Handler for HttpHandler {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(&self, message: &CanonicalMessage) -> Result<(), HandlerError> {
        debug!("Forwarding message {} to {}", message.source_id, self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(HandlerError::Rejected { status, body });
        }
        Ok(())
    }
}
