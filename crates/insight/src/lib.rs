//! Architectural insight client for Cantilever
//!
//! Asks a generative text service for a short JSON description of the villa.
//! Every failure (missing credential, transport, bad status, malformed JSON)
//! resolves to the same static fallback, so callers always get content.

mod fallback;
mod remote;

pub use fallback::fallback_insight;
pub use remote::GeminiTransport;

use std::time::Duration;

use cantilever_config::InsightConfig;
use cantilever_ipc::Insight;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Fixed architectural brief sent to the service
pub const ARCHITECTURE_PROMPT: &str = "Analyze the architectural style of a modern luxury villa with the following characteristics:
- Two-story stacked cubic forms
- Large glass facades with minimal framing
- Concrete and white stone exterior
- Large outdoor pool with ambient lighting
- Evening setting

Provide a JSON response with a title, a short description (max 50 words), and a list of 4 key architectural features.";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Service returned HTTP {0}")]
    Status(u16),

    #[error("Service returned no text")]
    EmptyResponse,

    #[error("Invalid insight JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Trait for text generation backends
#[allow(async_fn_in_trait)]
pub trait InsightTransport {
    /// Send the prompt and return the raw generated text
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Single-shot insight fetcher: one try, no retry, no timeout
pub struct InsightFetcher<T> {
    transport: Option<T>,
    fallback_delay: Duration,
}

impl InsightFetcher<GeminiTransport> {
    /// Build a fetcher from config; a missing credential selects the fallback path
    pub fn from_config(config: &InsightConfig) -> Self {
        let transport = config
            .api_key
            .as_ref()
            .map(|key| GeminiTransport::new(config.endpoint.clone(), key.clone()));
        Self {
            transport,
            fallback_delay: Duration::from_millis(config.fallback_delay_ms),
        }
    }
}

impl<T: InsightTransport> InsightFetcher<T> {
    pub fn new(transport: Option<T>) -> Self {
        Self {
            transport,
            fallback_delay: Duration::from_millis(cantilever_config::FALLBACK_DELAY_MS),
        }
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.transport.is_some()
    }

    /// Fetch an insight, substituting the fallback on any failure.
    ///
    /// Without a credential the fallback is returned after the configured
    /// delay so the loading state looks the same as a real request.
    pub async fn fetch(&self) -> Insight {
        match self.try_fetch().await {
            Ok(insight) => insight,
            Err(InsightError::MissingCredential) => {
                warn!("No API key provided, using fallback insight");
                tokio::time::sleep(self.fallback_delay).await;
                fallback_insight()
            }
            Err(e) => {
                error!("Insight service error: {e}");
                fallback_insight()
            }
        }
    }

    /// Fetch without the fallback, surfacing the failure
    pub async fn try_fetch(&self) -> Result<Insight, InsightError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(InsightError::MissingCredential)?;
        let text = transport.generate(ARCHITECTURE_PROMPT).await?;
        debug!("Insight service returned {} bytes", text.len());
        parse_insight(&text)
    }
}

/// Parse generated text as an insight record.
///
/// Models occasionally wrap JSON in a markdown fence even when asked for
/// `application/json`, so a surrounding ```json fence is stripped first.
pub fn parse_insight(text: &str) -> Result<Insight, InsightError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InsightError::EmptyResponse);
    }
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}
