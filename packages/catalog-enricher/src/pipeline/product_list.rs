use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use super::{Enricher, RunSummary};
use crate::checkpoint::FileMode;
use crate::error::Result;
use crate::report::{ReportHeader, ReportWriter};

/// Product names from a text file: one per line, blank lines and `#`
/// comments ignored.
pub fn read_product_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// `regenerated_products_results_<timestamp>.txt`
pub fn default_report_path() -> PathBuf {
    PathBuf::from(format!(
        "regenerated_products_results_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

impl Enricher {
    /// Describe a fixed list of products into a fresh report, ending with a
    /// processing summary.
    pub async fn product_list(&self, products: &[String], report: &Path) -> Result<RunSummary> {
        let header = ReportHeader::ProductList {
            generated_on: Local::now(),
            total: products.len(),
        };
        let mut writer = ReportWriter::open(report, FileMode::Truncate, &header)?;
        let mut summary = RunSummary {
            total: products.len(),
            ..Default::default()
        };

        info!(total = products.len(), report = %report.display(), "Starting product list run");

        for (i, product) in products.iter().enumerate() {
            if self.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            let number = i + 1;
            info!(number, total = products.len(), product = %product, "Processing product");

            let outcome = self.describe(product).await;
            if self.is_cancelled() {
                // Not written, so a resumed run picks this product up again.
                summary.interrupted = true;
                break;
            }
            writer.write_block(number, product, &outcome)?;
            summary.record(number, &outcome);

            if number < products.len() && !self.pause().await {
                summary.interrupted = true;
                break;
            }
        }

        writer.write_summary(&summary, Local::now())?;
        Ok(summary)
    }
}
