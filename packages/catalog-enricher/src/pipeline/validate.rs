use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Enricher;
use crate::fields::ContentField;
use crate::table::ProductTable;
use crate::traits::LinkChecker;

/// Link counts for one kind of media.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total: usize,
    pub working: usize,
    pub broken: usize,
}

impl LinkStats {
    fn add(&mut self, working: bool) {
        self.total += 1;
        if working {
            self.working += 1;
        } else {
            self.broken += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub images: LinkStats,
    pub videos: LinkStats,
    pub interrupted: bool,
}

impl Enricher {
    pub async fn validate(&self, table: &ProductTable) -> ValidationReport {
        validate_links(table, self.links.as_ref(), &self.cancel).await
    }
}

/// Check every image and video URL in the table. A link works when it
/// answers 200; a failed check counts as broken. Cells that do not start
/// with `http` are not links and are skipped.
pub async fn validate_links(
    table: &ProductTable,
    links: &dyn LinkChecker,
    cancel: &CancellationToken,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let media_fields = ContentField::IMAGES
        .into_iter()
        .chain(std::iter::once(ContentField::Video));

    'rows: for record in table.records() {
        for field in media_fields.clone() {
            if cancel.is_cancelled() {
                report.interrupted = true;
                break 'rows;
            }
            let Some(url) = record.value(field).map(str::trim).filter(|v| v.starts_with("http")) else {
                continue;
            };

            let checked = tokio::select! {
                _ = cancel.cancelled() => {
                    report.interrupted = true;
                    break 'rows;
                }
                checked = links.check(url) => checked,
            };
            let working = match checked {
                Ok(status) => status.is_ok(),
                Err(e) => {
                    debug!(url, error = %e, "Link check failed");
                    false
                }
            };

            if field.is_image() {
                report.images.add(working);
            } else {
                report.videos.add(working);
            }
        }
    }

    info!(
        images_working = report.images.working,
        images_broken = report.images.broken,
        videos_working = report.videos.working,
        videos_broken = report.videos.broken,
        "Link validation finished"
    );
    report
}
