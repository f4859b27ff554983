use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::security::SecretString;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_LANGUAGE: &str = "Bulgarian";
pub const DEFAULT_DELAY_SECS: f64 = 2.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 60.0;

/// Runtime configuration loaded from environment variables.
///
/// Credentials are optional here; the CLI may prompt for them before
/// calling [`Config::credentials`].
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<SecretString>,
    pub google_api_key: Option<SecretString>,
    pub search_engine_id: Option<String>,
    pub gemini_model: String,
    pub delay: Duration,
    /// Upper bound for one outbound API call.
    pub request_timeout: Duration,
    pub language: String,
}

/// Credentials every enrichment run needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub gemini_api_key: SecretString,
    pub google_api_key: SecretString,
    pub search_engine_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenv();

        let delay_secs = secs_var("ENRICH_DELAY_SECS", DEFAULT_DELAY_SECS)?;
        let timeout_secs = secs_var("ENRICH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            gemini_api_key: SecretString::from_env("GEMINI_API_KEY"),
            google_api_key: SecretString::from_env("GOOGLE_API_KEY"),
            search_engine_id: non_empty_var("SEARCH_ENGINE_ID")
                .or_else(|| non_empty_var("GOOGLE_SEARCH_ENGINE_ID")),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            delay: delay_from_secs(delay_secs)?,
            request_timeout: timeout_from_secs(timeout_secs)?,
            language: non_empty_var("CONTENT_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        })
    }

    /// Resolved credentials. Fails naming the first one still unset.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            gemini_api_key: self
                .gemini_api_key
                .clone()
                .context("GEMINI_API_KEY must be set")?,
            google_api_key: self
                .google_api_key
                .clone()
                .context("GOOGLE_API_KEY must be set")?,
            search_engine_id: self
                .search_engine_id
                .clone()
                .context("SEARCH_ENGINE_ID must be set")?,
        })
    }

    pub fn with_delay_secs(mut self, secs: f64) -> Result<Self> {
        self.delay = delay_from_secs(secs)?;
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            google_api_key: None,
            search_engine_id: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            delay: Duration::from_secs_f64(DEFAULT_DELAY_SECS),
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secs_var(key: &str, default: f64) -> Result<f64> {
    match non_empty_var(key) {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("{key} must be a number of seconds")),
        None => Ok(default),
    }
}

fn timeout_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .context("request timeout must be a positive number of seconds")
}

fn delay_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).context("delay must be a finite, non-negative number of seconds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_every_key() {
        let mut config = Config {
            gemini_api_key: Some(SecretString::new("g")),
            google_api_key: None,
            search_engine_id: Some("cx".into()),
            ..Config::default()
        };
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));

        config.google_api_key = Some(SecretString::new("k"));
        let creds = config.credentials().unwrap();
        assert_eq!(creds.search_engine_id, "cx");
        assert_eq!(creds.gemini_api_key.expose(), "g");
    }

    #[test]
    fn test_delay_validation() {
        let config = Config::default().with_delay_secs(0.5).unwrap();
        assert_eq!(config.delay, Duration::from_millis(500));
        assert!(Config::default().with_delay_secs(-1.0).is_err());
    }

    #[test]
    fn test_request_timeout_validation() {
        assert_eq!(timeout_from_secs(1.5).unwrap(), Duration::from_millis(1500));
        assert!(timeout_from_secs(0.0).is_err());
        assert!(timeout_from_secs(f64::NAN).is_err());
        assert_eq!(
            Config::default().request_timeout,
            Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let config = Config {
            gemini_api_key: Some(SecretString::new("super-secret")),
            ..Config::default()
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
