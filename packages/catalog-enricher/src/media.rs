//! Find working media for a product.
//!
//! Search results are candidates only. An image URL is kept after a live
//! check says it answers 200 with an image content type. Candidates are
//! checked one at a time, in ranking order.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::generation::MediaResult;
use crate::traits::{ImageSearch, LinkChecker, VideoSearch};

/// Maximum number of image slots per product.
pub const MAX_IMAGES: usize = 5;

pub fn image_query(product: &str) -> String {
    format!("{product} product high quality")
}

pub fn video_query(product: &str) -> String {
    format!("{product} review tutorial")
}

/// Composes image search, video search and link checking.
#[derive(Clone)]
pub struct MediaFinder {
    images: Arc<dyn ImageSearch>,
    videos: Arc<dyn VideoSearch>,
    links: Arc<dyn LinkChecker>,
}

impl MediaFinder {
    pub fn new(
        images: Arc<dyn ImageSearch>,
        videos: Arc<dyn VideoSearch>,
        links: Arc<dyn LinkChecker>,
    ) -> Self {
        Self {
            images,
            videos,
            links,
        }
    }

    /// Up to `n` validated image URLs.
    ///
    /// Requests `2 × n` candidates since many search hits are dead or not
    /// images. A search failure yields an empty list; a failed check just
    /// rejects that candidate.
    pub async fn working_images(&self, query: &str, n: usize) -> Vec<String> {
        if n == 0 {
            return Vec::new();
        }

        let candidates = match self.images.search_images(query, n * 2).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(query, error = %e, "Image search failed");
                return Vec::new();
            }
        };

        let mut working = Vec::with_capacity(n);
        for url in candidates {
            if working.len() >= n {
                break;
            }
            match self.links.check(&url).await {
                Ok(status) if status.is_working_image() => {
                    debug!(url = %url, "Image link OK");
                    working.push(url);
                }
                Ok(status) => {
                    debug!(url = %url, status = status.status, content_type = ?status.content_type, "Image link rejected");
                }
                Err(e) => debug!(url = %url, error = %e, "Image link check failed"),
            }
        }

        info!(query, found = working.len(), wanted = n, "Image search done");
        working
    }

    /// Top video by relevance. Errors are reported as "none found".
    pub async fn video(&self, query: &str) -> Option<String> {
        match self.videos.search_video(query).await {
            Ok(video) => video,
            Err(e) => {
                warn!(query, error = %e, "Video search failed");
                None
            }
        }
    }

    /// Media for `product`: `image_count` images, plus a video when asked.
    pub async fn find(&self, product: &str, image_count: usize, want_video: bool) -> MediaResult {
        let images = if image_count > 0 {
            self.working_images(&image_query(product), image_count).await
        } else {
            Vec::new()
        };
        let video = if want_video {
            self.video(&video_query(product)).await
        } else {
            None
        };
        MediaResult { images, video }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockImageSearch, MockLinkChecker, MockVideoSearch};

    fn finder(
        images: MockImageSearch,
        videos: MockVideoSearch,
        links: MockLinkChecker,
    ) -> (MediaFinder, Arc<MockImageSearch>, Arc<MockLinkChecker>) {
        let images = Arc::new(images);
        let links = Arc::new(links);
        let finder = MediaFinder::new(images.clone(), Arc::new(videos), links.clone());
        (finder, images, links)
    }

    #[tokio::test]
    async fn test_over_fetches_and_stops_at_n() {
        let (finder, images, links) = finder(
            MockImageSearch::new().with_urls(["http://1.jpg", "http://2.jpg", "http://3.jpg", "http://4.jpg"]),
            MockVideoSearch::new(),
            MockLinkChecker::new().with_broken("http://1.jpg"),
        );

        let found = finder.working_images("q", 2).await;

        assert_eq!(found, vec!["http://2.jpg", "http://3.jpg"]);
        assert_eq!(images.requests(), vec![("q".to_string(), 4)]);
        // Candidate 4 is never checked.
        assert_eq!(links.checked().len(), 3);
    }

    #[tokio::test]
    async fn test_search_error_yields_empty() {
        let (finder, _, links) = finder(
            MockImageSearch::new().failing(),
            MockVideoSearch::new(),
            MockLinkChecker::new(),
        );
        assert!(finder.working_images("q", 3).await.is_empty());
        assert!(links.checked().is_empty());
    }

    #[tokio::test]
    async fn test_non_image_content_type_rejected() {
        let (finder, _, _) = finder(
            MockImageSearch::new().with_urls(["http://page.html", "http://ok.png"]),
            MockVideoSearch::new(),
            MockLinkChecker::new().with_content_type("http://page.html", "text/html"),
        );
        assert_eq!(finder.working_images("q", 5).await, vec!["http://ok.png"]);
    }

    #[tokio::test]
    async fn test_video_error_is_none() {
        let (finder, _, _) = finder(
            MockImageSearch::new(),
            MockVideoSearch::new().failing(),
            MockLinkChecker::new(),
        );
        assert_eq!(finder.video("q").await, None);
    }

    #[tokio::test]
    async fn test_find_uses_product_queries() {
        let videos = Arc::new(MockVideoSearch::new().with_video("https://www.youtube.com/watch?v=abc"));
        let images = Arc::new(MockImageSearch::new().with_urls(["http://a.jpg"]));
        let finder = MediaFinder::new(images.clone(), videos.clone(), Arc::new(MockLinkChecker::new()));

        let media = finder.find("Coach Dreams", 1, true).await;

        assert_eq!(media.images, vec!["http://a.jpg"]);
        assert_eq!(media.video.as_deref(), Some("https://www.youtube.com/watch?v=abc"));
        assert_eq!(images.requests()[0].0, "Coach Dreams product high quality");
        assert_eq!(videos.queries(), vec!["Coach Dreams review tutorial"]);

        let none = finder.find("Coach Dreams", 0, false).await;
        assert_eq!(none, MediaResult::default());
    }
}
