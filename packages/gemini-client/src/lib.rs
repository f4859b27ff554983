//! Pure Gemini REST API client
//!
//! A clean, minimal client for the Gemini `generateContent` endpoint with no
//! domain-specific logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerateRequest};
//!
//! let client = GeminiClient::from_env()?.with_model("gemini-2.0-flash-exp");
//!
//! // One-shot prompt
//! let text = client.generate_text("Write a haiku about vetiver").await?;
//!
//! // Full request
//! let response = client
//!     .generate_content(&GenerateRequest::prompt("Hello!").temperature(0.7))
//!     .await?;
//! println!("{}", response.text);
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, regional endpoints, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model used by [`generate_content`](Self::generate_content).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Generate content from a full request.
    pub async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(GeminiError::Api(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let raw: types::GenerateResponseRaw = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        let result = first_candidate(raw)?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            finish_reason = ?result.finish_reason,
            "Gemini generateContent"
        );

        Ok(result)
    }

    /// Generate text for a single user prompt.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate_content(&GenerateRequest::prompt(prompt))
            .await
            .map(|r| r.text)
    }
}

/// Pick the first candidate's text out of a raw response.
fn first_candidate(raw: types::GenerateResponseRaw) -> Result<GenerateResponse> {
    if let Some(reason) = raw.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GeminiError::Blocked(format!("prompt blocked: {}", reason)));
    }

    let candidate = raw
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::Api("No candidates from Gemini".into()))?;

    let text = candidate.content.map(|c| c.text()).unwrap_or_default();
    if text.trim().is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => Err(
                GeminiError::Blocked(format!("candidate blocked: {:?}", candidate.finish_reason)),
            ),
            _ => Err(GeminiError::Api("Empty response from Gemini".into())),
        };
    }

    Ok(GenerateResponse {
        text,
        finish_reason: candidate.finish_reason,
        usage: raw.usage_metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> types::GenerateResponseRaw {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("key-test")
            .with_base_url("https://proxy.example.com/v1beta/")
            .with_model("gemini-1.5-pro");

        assert_eq!(client.api_key(), "key-test");
        assert_eq!(client.model(), "gemini-1.5-pro");
        assert_eq!(
            client.endpoint(),
            "https://proxy.example.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_default_endpoint() {
        let client = GeminiClient::new("k");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }

    #[test]
    fn test_first_candidate_text() {
        let response = first_candidate(raw(
            r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]},"finishReason":"STOP"}]}"#,
        ))
        .unwrap();
        assert_eq!(response.text, "ab");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_blocked_prompt() {
        let err = first_candidate(raw(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#))
            .unwrap_err();
        assert!(matches!(err, GeminiError::Blocked(_)));
    }

    #[test]
    fn test_no_candidates_is_api_error() {
        let err = first_candidate(raw(r#"{"candidates":[]}"#)).unwrap_err();
        assert!(matches!(err, GeminiError::Api(_)));
    }

    #[test]
    fn test_empty_safety_candidate_is_blocked() {
        let err = first_candidate(raw(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#))
            .unwrap_err();
        assert!(matches!(err, GeminiError::Blocked(_)));
    }
}
