use std::time::Duration;

use async_trait::async_trait;
use gemini_client::GeminiClient;
use tracing::{debug, warn};

use super::http_client;
use crate::error::{EnrichError, Result};
use crate::security::SecretString;
use crate::traits::ContentGenerator;

/// [`ContentGenerator`] backed by the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    /// Client for `model`; each request gives up after `timeout`.
    pub fn new(api_key: &SecretString, model: &str, timeout: Duration) -> Result<Self> {
        let http = http_client(timeout).map_err(|e| EnrichError::Generation(Box::new(e)))?;
        Ok(Self {
            client: GeminiClient::new(api_key.expose())
                .with_model(model)
                .with_http_client(http),
        })
    }

    pub fn from_client(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = self.client.model(), prompt_len = prompt.len(), "Generating content");
        self.client.generate_text(prompt).await.map_err(|e| {
            warn!(error = %e, "Gemini generation failed");
            EnrichError::Generation(Box::new(e))
        })
    }
}
