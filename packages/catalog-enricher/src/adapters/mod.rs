//! Network-backed implementations of the adapter traits.

mod gemini;
mod google;
mod http;

pub use gemini::GeminiGenerator;
pub use google::{search_client, GoogleImageSearcher, YouTubeSearcher};
pub use http::HttpLinkChecker;

use std::time::Duration;

/// HTTP client whose every request gives up after `timeout`.
fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
}
