use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use super::{Enricher, RowSelection};
use crate::classifier::{analyze, IncompleteRecord};
use crate::error::Result;
use crate::generation::GenerationResult;
use crate::merge::apply_generation;
use crate::parse::parse_sections;
use crate::prompts::missing_fields_prompt;
use crate::table::{create_backup, ProductTable};

/// Suffix of the backup written before a regeneration run.
pub const BACKUP_SUFFIX: &str = "_backup_regen";

#[derive(Debug, Clone, Default)]
pub struct RegenerateOptions {
    /// Where the updated table goes. Defaults to
    /// [`default_output_path`]; may equal the input for in-place updates.
    pub output: Option<PathBuf>,
    /// Only rows in this selection are processed.
    pub rows: Option<RowSelection>,
}

/// `updated_products_<timestamp>.csv`
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "updated_products_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// What happened to one incomplete record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub fields_updated: usize,
    /// Set when the text service failed; media may still have been merged.
    pub generation_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegenerateSummary {
    pub total_records: usize,
    /// Rows with at least one blank content field.
    pub incomplete: usize,
    /// Incomplete rows left after the row selection.
    pub selected: usize,
    pub processed: usize,
    pub records_updated: usize,
    pub fields_updated: usize,
    pub generation_failures: usize,
    /// Records that failed outright (merge or save errors).
    pub failed: usize,
    pub interrupted: bool,
    pub output: PathBuf,
    pub backup: Option<PathBuf>,
}

impl Enricher {
    /// Fill only the blank content fields of `input`, saving the table to
    /// the output path after every record that changed.
    pub async fn regenerate(&self, input: &Path, options: RegenerateOptions) -> Result<RegenerateSummary> {
        let mut table = ProductTable::load(input)?;
        let report = analyze(&table);
        let incomplete = report.incomplete.len();

        let records: Vec<IncompleteRecord> = report
            .incomplete
            .into_iter()
            .filter(|r| options.rows.as_ref().map_or(true, |rows| rows.contains(r.index)))
            .collect();

        let mut summary = RegenerateSummary {
            total_records: report.total_records,
            incomplete,
            selected: records.len(),
            output: options.output.unwrap_or_else(default_output_path),
            ..Default::default()
        };

        if records.is_empty() {
            info!(incomplete, "Nothing to regenerate");
            return Ok(summary);
        }

        let (backup, _) = create_backup(input, BACKUP_SUFFIX)?;
        summary.backup = Some(backup);

        info!(
            records = records.len(),
            output = %summary.output.display(),
            "Starting regeneration"
        );

        for (i, record) in records.iter().enumerate() {
            if self.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            info!(
                n = i + 1,
                of = records.len(),
                row = record.index + 1,
                product = %record.display_name(),
                missing = record.missing.len(),
                "Regenerating record"
            );

            let outcome = self.regenerate_record(&mut table, record).await;
            if self.is_cancelled() {
                // The row may be half merged in memory; it is never saved.
                summary.interrupted = true;
                break;
            }

            match outcome {
                Ok(outcome) => {
                    if outcome.generation_error.is_some() {
                        summary.generation_failures += 1;
                    }
                    if outcome.fields_updated > 0 {
                        match table.save(&summary.output) {
                            Ok(()) => {
                                summary.records_updated += 1;
                                summary.fields_updated += outcome.fields_updated;
                                info!(row = record.index + 1, fields = outcome.fields_updated, "Record updated and saved");
                            }
                            Err(e) => {
                                warn!(row = record.index + 1, error = %e, "Failed to save progress");
                                summary.failed += 1;
                            }
                        }
                    } else {
                        info!(row = record.index + 1, "No content generated");
                    }
                }
                Err(e) => {
                    warn!(row = record.index + 1, error = %e, "Record failed");
                    summary.failed += 1;
                }
            }
            summary.processed += 1;

            if i + 1 < records.len() && !self.pause().await {
                summary.interrupted = true;
                break;
            }
        }

        Ok(summary)
    }

    /// Generate and merge the missing fields of one record.
    ///
    /// A text service failure leaves the text fields alone but still lets
    /// media fill image and video slots.
    pub async fn regenerate_record(
        &self,
        table: &mut ProductTable,
        record: &IncompleteRecord,
    ) -> Result<RecordOutcome> {
        let product = record.display_name();
        let text_fields = record.missing_text();
        let mut outcome = RecordOutcome::default();

        let text = if text_fields.is_empty() {
            BTreeMap::new()
        } else {
            let prompt = missing_fields_prompt(&product, &text_fields, &self.language);
            match self.generate(&prompt).await {
                Ok(reply) => parse_sections(&reply, &text_fields),
                Err(e) => {
                    warn!(product = %product, error = %e, "Text generation failed");
                    outcome.generation_error = Some(e.to_string());
                    BTreeMap::new()
                }
            }
        };

        let media = self
            .find_media(&product, record.missing_images().len(), record.missing_video())
            .await;

        let result = GenerationResult::new(text, media);
        outcome.fields_updated = apply_generation(table, record.index, &record.missing, &result)?;
        Ok(outcome)
    }
}
