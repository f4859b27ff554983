use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use google_search_client::{GoogleSearchClient, ImageSearchParams, VideoSearchParams};

use super::http_client;
use crate::config::Credentials;
use crate::error::{EnrichError, Result};
use crate::traits::{ImageSearch, VideoSearch};

/// One search client for both searchers; each request gives up after `timeout`.
pub fn search_client(credentials: &Credentials, timeout: Duration) -> Result<Arc<GoogleSearchClient>> {
    let http = http_client(timeout).map_err(|e| EnrichError::Search(Box::new(e)))?;
    Ok(Arc::new(
        GoogleSearchClient::new(
            credentials.google_api_key.expose().to_string(),
            credentials.search_engine_id.clone(),
        )
        .with_http_client(http),
    ))
}

/// [`ImageSearch`] over the Custom Search JSON API.
#[derive(Clone)]
pub struct GoogleImageSearcher {
    client: Arc<GoogleSearchClient>,
}

impl GoogleImageSearcher {
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        Ok(Self::from_client(search_client(credentials, timeout)?))
    }

    pub fn from_client(client: Arc<GoogleSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSearch for GoogleImageSearcher {
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let num = u32::try_from(count).unwrap_or(u32::MAX);
        self.client
            .search_images(&ImageSearchParams::new(query, num))
            .await
            .map_err(|e| EnrichError::Search(Box::new(e)))
    }
}

/// [`VideoSearch`] over the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeSearcher {
    client: Arc<GoogleSearchClient>,
}

impl YouTubeSearcher {
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        Ok(Self::from_client(search_client(credentials, timeout)?))
    }

    pub fn from_client(client: Arc<GoogleSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearcher {
    async fn search_video(&self, query: &str) -> Result<Option<String>> {
        let hits = self
            .client
            .search_videos(&VideoSearchParams::new(query))
            .await
            .map_err(|e| EnrichError::Search(Box::new(e)))?;
        Ok(hits.first().map(|hit| hit.watch_url()))
    }
}
