//! Provider API client used to check keys and fetch acquisition guides

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ValidatorError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("HTTP error: {0}")]
    HttpError(u16),
    #[error("Timeout")]
    Timeout,
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Trait for calls to a provider's generative endpoint
///
/// Production: reqwest client against the Gemini API
/// Testing: Recorded responses
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValidator: Send + Sync {
    /// Send a trivial request with `secret`; Ok(()) means the provider accepted it
    async fn ping(&self, secret: &str) -> Result<(), ValidatorError>;

    /// Ask the model, authenticated with `secret`, for steps to obtain a key for `provider`.
    /// `Ok(None)` when the model returned no text.
    async fn ask_guide(&self, secret: &str, provider: &str) -> Result<Option<String>, ValidatorError>;
}

/// Fallback text when the model answers without content
pub const EMPTY_GUIDE: &str = "Could not obtain guide.";
/// User-visible text when the guide request fails
pub const GUIDE_ERROR: &str = "Error: Could not fetch instructions. Check your master API key.";

/// Validate a key, folding every failure into `false`
pub async fn validate_key(validator: &dyn KeyValidator, secret: &str) -> bool {
    match validator.ping(secret).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Key validation failed");
            false
        }
    }
}

/// Fetch an acquisition guide, folding every failure into a displayable string
pub async fn generate_guide(validator: &dyn KeyValidator, secret: &str, provider: &str) -> String {
    match validator.ask_guide(secret, provider).await {
        Ok(Some(text)) if !text.trim().is_empty() => text,
        Ok(_) => EMPTY_GUIDE.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, provider = %provider, "Guide request failed");
            GUIDE_ERROR.to_string()
        }
    }
}
