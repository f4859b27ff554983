//! Per-product output of one enrichment pass.

use std::collections::BTreeMap;

use crate::fields::ContentField;

/// Validated media for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaResult {
    /// Working image URLs in search ranking order.
    pub images: Vec<String>,
    pub video: Option<String>,
}

/// Everything produced for one product, consumed immediately by the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: BTreeMap<ContentField, String>,
    pub images: Vec<String>,
    pub video: Option<String>,
}

impl GenerationResult {
    pub fn new(text: BTreeMap<ContentField, String>, media: MediaResult) -> Self {
        Self {
            text,
            images: media.images,
            video: media.video,
        }
    }

    pub fn with_text(mut self, field: ContentField, value: impl Into<String>) -> Self {
        self.text.insert(field, value.into());
        self
    }

    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.video = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty() && self.video.is_none()
    }
}
