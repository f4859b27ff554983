//! Mock implementations of the adapter traits.
//!
//! Useful for exercising pipelines without network calls. Every mock
//! records its calls for assertions.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{EnrichError, Result};
use crate::traits::{ContentGenerator, ImageSearch, LinkChecker, LinkStatus, VideoSearch};

/// Mock text generator.
///
/// Replies with the first configured response whose key occurs in the
/// prompt, else the default response.
#[derive(Default)]
pub struct MockGenerator {
    default_response: String,
    responses: Vec<(String, String)>,
    failing: HashSet<String>,
    fail_all: bool,
    latency: Option<Duration>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, text: impl Into<String>) -> Self {
        self.default_response = text.into();
        self
    }

    /// Reply with `text` when the prompt mentions `needle`.
    pub fn with_response_for(mut self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.responses.push((needle.into(), text.into()));
        self
    }

    /// Fail when the prompt mentions `needle`.
    pub fn failing_for(mut self, needle: impl Into<String>) -> Self {
        self.failing.insert(needle.into());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Wait this long before answering, like a slow or stalled service.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.write().unwrap().push(prompt.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail_all || self.failing.iter().any(|n| prompt.contains(n.as_str())) {
            return Err(EnrichError::Generation("mock generation failure".into()));
        }

        Ok(self
            .responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, text)| text.clone())
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

/// Mock image search returning a fixed candidate list.
#[derive(Default)]
pub struct MockImageSearch {
    urls: Vec<String>,
    fail: bool,
    requests: Arc<RwLock<Vec<(String, usize)>>>,
}

impl MockImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// `(query, count)` pairs received so far.
    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.read().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for MockImageSearch {
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<String>> {
        self.requests
            .write()
            .unwrap()
            .push((query.to_string(), count));
        if self.fail {
            return Err(EnrichError::Search("mock image search failure".into()));
        }
        Ok(self.urls.iter().take(count).cloned().collect())
    }
}

/// Mock video search.
#[derive(Default)]
pub struct MockVideoSearch {
    video: Option<String>,
    fail: bool,
    queries: Arc<RwLock<Vec<String>>>,
}

impl MockVideoSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.video = Some(url.into());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for MockVideoSearch {
    async fn search_video(&self, query: &str) -> Result<Option<String>> {
        self.queries.write().unwrap().push(query.to_string());
        if self.fail {
            return Err(EnrichError::Search("mock video search failure".into()));
        }
        Ok(self.video.clone())
    }
}

/// Mock link checker. Every URL answers `200 image/jpeg` unless configured.
#[derive(Default)]
pub struct MockLinkChecker {
    overrides: HashMap<String, LinkStatus>,
    errors: HashSet<String>,
    checked: Arc<RwLock<Vec<String>>>,
}

impl MockLinkChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer 404 for `url`.
    pub fn with_broken(mut self, url: impl Into<String>) -> Self {
        self.overrides
            .insert(url.into(), LinkStatus::new(404, Some("text/html")));
        self
    }

    /// Answer 200 with `content_type` for `url`.
    pub fn with_content_type(mut self, url: impl Into<String>, content_type: &str) -> Self {
        self.overrides
            .insert(url.into(), LinkStatus::new(200, Some(content_type)));
        self
    }

    /// Fail the check itself for `url`.
    pub fn with_error(mut self, url: impl Into<String>) -> Self {
        self.errors.insert(url.into());
        self
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.read().unwrap().clone()
    }
}

#[async_trait]
impl LinkChecker for MockLinkChecker {
    async fn check(&self, url: &str) -> Result<LinkStatus> {
        self.checked.write().unwrap().push(url.to_string());
        if self.errors.contains(url) {
            return Err(EnrichError::LinkCheck {
                url: url.to_string(),
                source: "mock connection refused".into(),
            });
        }
        Ok(self
            .overrides
            .get(url)
            .cloned()
            .unwrap_or_else(|| LinkStatus::new(200, Some("image/jpeg"))))
    }
}
