//! Reqwest-based client for the Gemini generateContent endpoint

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::traits::{KeyValidator, ValidatorError};

const TIMEOUT_SECONDS: u64 = 25;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn guide_prompt(provider: &str) -> String {
    format!(
        "Provide a short step-by-step guide on how to get a free API key for {} immediately. \
         Focus on the fastest URL to visit. Format as a bulleted list. \
         Do not include introductory filler text. Respond in English.",
        provider
    )
}

pub struct GeminiKeyValidator {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiKeyValidator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, ValidatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .map_err(|e| ValidatorError::NetworkError(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        tracing::debug!(base_url = %base_url, model = %model, "Initialized Gemini client with {}s timeout", TIMEOUT_SECONDS);
        Ok(Self { client, base_url, model })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, secret: &str, prompt: &str) -> Result<GenerateResponse, ValidatorError> {
        let url = self.endpoint();
        reqwest::Url::parse(&url).map_err(|e| ValidatorError::NetworkError(e.to_string()))?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", secret)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::warn!("Gemini request timed out");
                    ValidatorError::Timeout
                } else {
                    tracing::warn!("Network error: {}", e);
                    ValidatorError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            tracing::warn!(status, "Gemini returned error status");
            return Err(ValidatorError::HttpError(status));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| ValidatorError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl KeyValidator for GeminiKeyValidator {
    async fn ping(&self, secret: &str) -> Result<(), ValidatorError> {
        tracing::info!(model = %self.model, "Validating key against Gemini");
        self.generate(secret, "ping").await.map(|_| ())
    }

    async fn ask_guide(&self, secret: &str, provider: &str) -> Result<Option<String>, ValidatorError> {
        tracing::info!(provider = %provider, "Requesting acquisition guide");
        let response = self.generate(secret, &guide_prompt(provider)).await?;
        Ok(response.text())
    }
}
