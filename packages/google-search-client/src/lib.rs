//! Pure Google search REST API client.
//!
//! A minimal client for two Google APIs: Custom Search JSON API (image
//! search against a programmable search engine) and the YouTube Data API v3
//! `search.list` endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use google_search_client::{GoogleSearchClient, ImageSearchParams, VideoSearchParams};
//!
//! let client = GoogleSearchClient::new("api-key".into(), "engine-id".into());
//!
//! let links = client.search_images(&ImageSearchParams::new("Lalique Satine", 10)).await?;
//! let video = client.search_videos(&VideoSearchParams::new("Lalique Satine review")).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SearchError};
pub use types::{
    CustomSearchItem, CustomSearchResponse, ImageSearchParams, VideoHit, VideoSearchParams,
    YouTubeSearchResponse,
};

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Custom Search returns at most 10 items per request.
const MAX_PAGE_SIZE: u32 = 10;

/// Custom Search refuses `start + num > 100`.
const MAX_TOTAL_RESULTS: u32 = 100;

pub struct GoogleSearchClient {
    client: reqwest::Client,
    api_key: String,
    search_engine_id: String,
    custom_search_url: String,
    youtube_search_url: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: String, search_engine_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            search_engine_id,
            custom_search_url: CUSTOM_SEARCH_URL.to_string(),
            youtube_search_url: YOUTUBE_SEARCH_URL.to_string(),
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point both endpoints at a different host (proxies, test servers).
    pub fn with_base_urls(
        mut self,
        custom_search_url: impl Into<String>,
        youtube_search_url: impl Into<String>,
    ) -> Self {
        self.custom_search_url = custom_search_url.into();
        self.youtube_search_url = youtube_search_url.into();
        self
    }

    /// Image search. Returns result links in ranking order, paging through
    /// the API until `params.num` links are collected or results run out.
    pub async fn search_images(&self, params: &ImageSearchParams) -> Result<Vec<String>> {
        if params.query.trim().is_empty() {
            return Err(SearchError::InvalidRequest("empty query".into()));
        }

        let wanted = params.num.min(MAX_TOTAL_RESULTS);
        let mut links = Vec::with_capacity(wanted as usize);

        for (start, num) in page_plan(wanted) {
            let page = self.image_page(params, start, num).await?;
            let returned = page.items.len();
            links.extend(page.items.into_iter().filter_map(|item| item.link));

            if (returned as u32) < num {
                break;
            }
        }

        links.truncate(wanted as usize);
        tracing::debug!(query = %params.query, count = links.len(), "Image search complete");
        Ok(links)
    }

    async fn image_page(
        &self,
        params: &ImageSearchParams,
        start: u32,
        num: u32,
    ) -> Result<CustomSearchResponse> {
        let resp = self
            .client
            .get(&self.custom_search_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", params.query.as_str()),
                ("searchType", "image"),
                ("imgSize", params.img_size.as_str()),
                ("imgType", params.img_type.as_str()),
                ("safe", params.safe.as_str()),
            ])
            .query(&[("num", num), ("start", start)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// YouTube video search. Returns hits in the requested order.
    pub async fn search_videos(&self, params: &VideoSearchParams) -> Result<Vec<VideoHit>> {
        if params.query.trim().is_empty() {
            return Err(SearchError::InvalidRequest("empty query".into()));
        }

        let resp = self
            .client
            .get(&self.youtube_search_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", params.query.as_str()),
                ("part", "snippet"),
                ("type", "video"),
                ("order", params.order.as_str()),
                ("safeSearch", params.safe_search.as_str()),
            ])
            .query(&[("maxResults", params.max_results)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: YouTubeSearchResponse = resp.json().await?;
        let hits = video_hits(body);
        tracing::debug!(query = %params.query, count = hits.len(), "Video search complete");
        Ok(hits)
    }
}

/// Split a total result count into `(start, num)` requests.
fn page_plan(total: u32) -> Vec<(u32, u32)> {
    let mut pages = Vec::new();
    let mut start = 1;
    let mut remaining = total;
    while remaining > 0 {
        let num = remaining.min(MAX_PAGE_SIZE);
        pages.push((start, num));
        start += num;
        remaining -= num;
    }
    pages
}

fn video_hits(body: YouTubeSearchResponse) -> Vec<VideoHit> {
    body.items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            Some(VideoHit {
                video_id,
                title: item.snippet.and_then(|s| s.title),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_plan() {
        assert!(page_plan(0).is_empty());
        assert_eq!(page_plan(10), vec![(1, 10)]);
        assert_eq!(page_plan(4), vec![(1, 4)]);
        assert_eq!(page_plan(23), vec![(1, 10), (11, 10), (21, 3)]);
    }

    #[test]
    fn test_custom_search_items_without_link_are_tolerated() {
        let body: CustomSearchResponse = serde_json::from_str(
            r#"{"items":[{"link":"https://a.example/1.jpg","mime":"image/jpeg"},{"title":"no link"}]}"#,
        )
        .unwrap();
        let links: Vec<_> = body.items.into_iter().filter_map(|i| i.link).collect();
        assert_eq!(links, vec!["https://a.example/1.jpg"]);
    }

    #[test]
    fn test_empty_custom_search_response() {
        let body: CustomSearchResponse = serde_json::from_str(r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_video_hits_skip_non_video_ids() {
        let body: YouTubeSearchResponse = serde_json::from_str(
            r#"{"items":[
                {"id":{"kind":"youtube#channel","channelId":"c1"}},
                {"id":{"kind":"youtube#video","videoId":"abc123"},"snippet":{"title":"Review"}}
            ]}"#,
        )
        .unwrap();

        let hits = video_hits(body);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].watch_url(), "https://www.youtube.com/watch?v=abc123");
        assert_eq!(hits[0].title.as_deref(), Some("Review"));
    }

    #[test]
    fn test_default_params() {
        let image = ImageSearchParams::new("q", 10);
        assert_eq!(image.safe, "active");
        let video = VideoSearchParams::new("q");
        assert_eq!(video.max_results, 1);
        assert_eq!(video.order, "relevance");
    }
}
