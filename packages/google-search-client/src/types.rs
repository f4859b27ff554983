use serde::{Deserialize, Serialize};

/// Parameters for a Custom Search image query.
#[derive(Debug, Clone)]
pub struct ImageSearchParams {
    pub query: String,
    /// Total number of results wanted. Fetched in pages of at most 10.
    pub num: u32,
    pub img_size: String,
    pub img_type: String,
    pub safe: String,
}

impl ImageSearchParams {
    pub fn new(query: impl Into<String>, num: u32) -> Self {
        Self {
            query: query.into(),
            num,
            img_size: "LARGE".to_string(),
            img_type: "photo".to_string(),
            safe: "active".to_string(),
        }
    }
}

/// Parameters for a YouTube Data API search.
#[derive(Debug, Clone)]
pub struct VideoSearchParams {
    pub query: String,
    pub max_results: u32,
    pub order: String,
    pub safe_search: String,
}

impl VideoSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 1,
            order: "relevance".to_string(),
            safe_search: "moderate".to_string(),
        }
    }
}

/// Custom Search JSON API response.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomSearchResponse {
    #[serde(default)]
    pub items: Vec<CustomSearchItem>,
}

/// A single Custom Search result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomSearchItem {
    pub link: Option<String>,
    pub title: Option<String>,
    pub mime: Option<String>,
    #[serde(rename = "displayLink")]
    pub display_link: Option<String>,
}

/// YouTube `search.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YouTubeSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchItem {
    pub id: YouTubeItemId,
    pub snippet: Option<YouTubeSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeItemId {
    pub kind: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSnippet {
    pub title: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
}

/// A video hit resolved to a watch URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHit {
    pub video_id: String,
    pub title: Option<String>,
}

impl VideoHit {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}
