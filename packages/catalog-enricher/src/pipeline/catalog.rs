use std::path::Path;

use tracing::info;

use super::{Enricher, RunSummary};
use crate::checkpoint::ResumePlan;
use crate::error::Result;
use crate::report::{ReportHeader, ReportWriter};
use crate::table::ProductTable;

#[derive(Debug, Clone, Copy)]
pub struct CatalogOptions {
    /// Continue after the last `PRODUCT N:` block of an existing report.
    pub resume: bool,
    /// Explicit 1-based product to start from. Wins over `resume`.
    pub start_from: Option<usize>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            resume: true,
            start_from: None,
        }
    }
}

/// Product names of a catalog run: every non-blank `Line` cell, in order.
pub fn catalog_products(table: &ProductTable) -> Vec<String> {
    table
        .records()
        .filter_map(|record| record.line().map(str::to_string))
        .collect()
}

impl Enricher {
    /// Describe every product of the table into `report`, resuming where a
    /// previous run stopped.
    pub async fn catalog(
        &self,
        table: &ProductTable,
        report: &Path,
        options: CatalogOptions,
    ) -> Result<RunSummary> {
        let products = catalog_products(table);
        let plan = ResumePlan::decide(report, options.resume, options.start_from);
        let mut summary = RunSummary {
            total: products.len(),
            last_processed: plan.start_index.min(products.len()),
            ..Default::default()
        };

        info!(
            total = products.len(),
            start = plan.start_index + 1,
            report = %report.display(),
            "Starting catalog run"
        );

        let mut writer = ReportWriter::open(report, plan.mode, &ReportHeader::Catalog)?;

        for (i, product) in products.iter().enumerate().skip(plan.start_index) {
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

        info!(
            processed = summary.processed,
            last = summary.last_processed,
            total = summary.total,
            interrupted = summary.interrupted,
            "Catalog run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_products_skips_blank_lines() {
        let table = ProductTable::read_from("ID,Brand,Line\n1,A,One\n2,B,  \n3,C,Three\n".as_bytes()).unwrap();
        assert_eq!(catalog_products(&table), vec!["One", "Three"]);
    }
}
