//! Gemini REST client

use crate::{InsightError, InsightTransport};
use serde::{Deserialize, Serialize};

/// Generative text client for the Gemini `generateContent` endpoint
pub struct GeminiTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

impl InsightTransport for GeminiTransport {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightError::Status(status.as_u16()));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        payload.first_text().ok_or(InsightError::EmptyResponse)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if any
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.clone())
            .filter(|text| !text.trim().is_empty())
    }
}
