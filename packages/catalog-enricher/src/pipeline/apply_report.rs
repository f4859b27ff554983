use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::classifier::missing_fields;
use crate::error::Result;
use crate::merge::apply_generation;
use crate::report::{parse_report, ReportBlock};
use crate::table::{create_backup, ProductTable};

pub const BACKUP_SUFFIX: &str = "_backup";

#[derive(Debug, Clone, Default)]
pub struct ApplyReportOptions {
    /// Write here instead of updating the table in place.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplyReportSummary {
    /// Successful blocks found in the report.
    pub blocks: usize,
    /// Blocks whose product name matched no `Line` cell.
    pub unmatched: usize,
    pub records_updated: usize,
    pub fields_updated: usize,
    pub output: PathBuf,
    pub backup: Option<PathBuf>,
}

/// Merge report blocks into rows matched by `Line`.
///
/// Only blank cells are filled, so re-applying a report is a no-op.
pub fn apply_blocks(table: &mut ProductTable, blocks: &[ReportBlock]) -> Result<ApplyReportSummary> {
    let mut summary = ApplyReportSummary {
        blocks: blocks.len(),
        ..Default::default()
    };

    for block in blocks.iter().filter(|b| b.has_content()) {
        let Some(row) = table.find_by_line(&block.name) else {
            debug!(product = %block.name, "No matching row");
            summary.unmatched += 1;
            continue;
        };
        let missing = match table.record(row) {
            Some(record) => missing_fields(&record),
            None => continue,
        };

        let written = apply_generation(table, row, &missing, &block.to_generation())?;
        if written > 0 {
            summary.records_updated += 1;
            summary.fields_updated += written;
            info!(row = row + 1, product = %block.name, fields = written, "Applied report block");
        }
    }

    Ok(summary)
}

/// Apply the report at `report` to the catalog at `table_path`.
pub fn apply_report_file(
    report: &Path,
    table_path: &Path,
    options: ApplyReportOptions,
) -> Result<ApplyReportSummary> {
    let text = fs::read_to_string(report)?;
    let blocks = parse_report(&text);
    let mut table = ProductTable::load(table_path)?;

    let mut summary = apply_blocks(&mut table, &blocks)?;

    match options.output {
        Some(output) => {
            table.save(&output)?;
            summary.output = output;
        }
        None => {
            let (backup, _) = create_backup(table_path, BACKUP_SUFFIX)?;
            table.save(table_path)?;
            summary.backup = Some(backup);
            summary.output = table_path.to_path_buf();
        }
    }

    info!(
        blocks = summary.blocks,
        records = summary.records_updated,
        fields = summary.fields_updated,
        unmatched = summary.unmatched,
        "Report applied"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ContentField;
    use crate::report::{render_block, ReportOutcome};

    #[test]
    fn test_apply_blocks_matches_by_line_without_overwrite() {
        let mut table = ProductTable::read_from(
            "ID,Brand,Line,Image 1\n1,Lalique,Satine,http://keep.jpg\n2,Coach,Dreams,\n".as_bytes(),
        )
        .unwrap();

        let mut text = render_block(
            1,
            "Satine",
            &ReportOutcome::Success {
                description: "**1. Captivating Headline:**\nСатен".into(),
                images: vec!["http://new1.jpg".into(), "http://new2.jpg".into()],
                video: None,
            },
        );
        text.push_str(&render_block(
            2,
            "Unknown",
            &ReportOutcome::Success {
                description: "x".into(),
                images: vec!["http://u.jpg".into()],
                video: None,
            },
        ));

        let summary = apply_blocks(&mut table, &parse_report(&text)).unwrap();

        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.records_updated, 1);
        // Image 1 kept, first URL goes to the lowest blank slot.
        assert_eq!(table.value(0, ContentField::Image1), Some("http://keep.jpg"));
        assert_eq!(table.value(0, ContentField::Image2), Some("http://new1.jpg"));
        assert_eq!(table.value(0, ContentField::Image3), Some("http://new2.jpg"));
        assert_eq!(table.value(0, ContentField::Headline), Some("Сатен"));
        assert_eq!(summary.fields_updated, 3);

        let again = apply_blocks(&mut table, &parse_report(&text)).unwrap();
        assert_eq!(again.fields_updated, 0);
    }
}
