//! Media search and link validation.

use async_trait::async_trait;

use crate::error::Result;

/// Image search backend. Returns candidate URLs in ranking order.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<String>>;
}

/// Video search backend. Returns the top result by relevance, if any.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_video(&self, query: &str) -> Result<Option<String>>;
}

/// Checks whether a URL currently resolves.
#[async_trait]
pub trait LinkChecker: Send + Sync {
    async fn check(&self, url: &str) -> Result<LinkStatus>;
}

/// Outcome of a link check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub status: u16,
    pub content_type: Option<String>,
}

/// Content-type fragments accepted as an image.
const IMAGE_SIGNATURES: [&str; 6] = ["image/", "jpeg", "jpg", "png", "gif", "webp"];

impl LinkStatus {
    pub fn new(status: u16, content_type: Option<impl Into<String>>) -> Self {
        Self {
            status,
            content_type: content_type.map(Into::into),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Status 200 and a content type that looks like an image.
    pub fn is_working_image(&self) -> bool {
        self.is_ok()
            && self.content_type.as_deref().is_some_and(|ct| {
                let ct = ct.to_ascii_lowercase();
                IMAGE_SIGNATURES.iter().any(|sig| ct.contains(sig))
            })
    }
}
