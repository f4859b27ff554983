//! Sequential enrichment runs.
//!
//! Every run walks its records one at a time with a fixed pause between
//! records. Cancellation is checked between records, during the pause and
//! while an outbound call is in flight. A record interrupted mid-call is not
//! persisted; whatever was persisted before it stays on disk.

mod apply_report;
mod catalog;
mod import;
mod product_list;
mod regenerate;
mod selection;
mod validate;

pub use apply_report::{apply_blocks, apply_report_file, ApplyReportOptions, ApplyReportSummary};
pub use catalog::{catalog_products, CatalogOptions};
pub use import::{import_by_id, import_file, ImportSummary};
pub use product_list::{default_report_path, read_product_list};
pub use regenerate::{default_output_path, RecordOutcome, RegenerateOptions, RegenerateSummary};
pub use selection::{RowSelection, SelectionError};
pub use validate::{validate_links, LinkStats, ValidationReport};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{DEFAULT_DELAY_SECS, DEFAULT_LANGUAGE, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::{EnrichError, Result};
use crate::generation::MediaResult;
use crate::media::{MediaFinder, MAX_IMAGES};
use crate::prompts::full_description_prompt;
use crate::report::ReportOutcome;
use crate::traits::{ContentGenerator, LinkChecker};

/// Counters for report-producing runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Products in the run's input.
    pub total: usize,
    /// Products handled by this invocation.
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub images: usize,
    pub videos: usize,
    /// 1-based number of the last product written to the report.
    pub last_processed: usize,
    pub interrupted: bool,
}

impl RunSummary {
    fn record(&mut self, number: usize, outcome: &ReportOutcome) {
        self.processed += 1;
        self.last_processed = number;
        match outcome {
            ReportOutcome::Success { images, video, .. } => {
                self.successful += 1;
                self.images += images.len();
                self.videos += usize::from(video.is_some());
            }
            ReportOutcome::Error(_) => self.failed += 1,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.last_processed >= self.total
    }
}

/// Shared context for every run: the adapters plus pacing and cancellation.
#[derive(Clone)]
pub struct Enricher {
    generator: Arc<dyn ContentGenerator>,
    media: MediaFinder,
    links: Arc<dyn LinkChecker>,
    language: String,
    delay: Duration,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl Enricher {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        media: MediaFinder,
        links: Arc<dyn LinkChecker>,
    ) -> Self {
        Self {
            generator,
            media,
            links,
            language: DEFAULT_LANGUAGE.to_string(),
            delay: Duration::from_secs_f64(DEFAULT_DELAY_SECS),
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Upper bound for one text generation call. Media searches are bounded
    /// by their adapters' HTTP timeouts.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sleep the configured delay. Returns `false` if cancelled first.
    async fn pause(&self) -> bool {
        if self.delay.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }

    /// Run `call` until it finishes, the request timeout passes, or the run
    /// is cancelled.
    async fn guarded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(EnrichError::Cancelled),
            outcome = tokio::time::timeout(self.request_timeout, call) => {
                outcome.unwrap_or(Err(EnrichError::Timeout(self.request_timeout)))
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.guarded(self.generator.generate(prompt)).await
    }

    /// Media search that gives up empty-handed when the run is cancelled.
    async fn find_media(&self, product: &str, image_count: usize, want_video: bool) -> MediaResult {
        tokio::select! {
            _ = self.cancel.cancelled() => MediaResult::default(),
            media = self.media.find(product, image_count, want_video) => media,
        }
    }

    /// Full description plus media for one product name.
    ///
    /// Generation runs first; when it fails no media search is made.
    pub async fn describe(&self, product: &str) -> ReportOutcome {
        let prompt = full_description_prompt(product, &self.language);
        let description = match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(product, error = %e, "Description generation failed");
                return ReportOutcome::Error(format!("Error: {e}"));
            }
        };

        let media = self.find_media(product, MAX_IMAGES, true).await;
        info!(
            product,
            images = media.images.len(),
            video = media.video.is_some(),
            "Product described"
        );
        ReportOutcome::Success {
            description,
            images: media.images,
            video: media.video,
        }
    }
}
