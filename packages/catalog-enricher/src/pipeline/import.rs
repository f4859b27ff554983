use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::fields::ContentField;
use crate::merge::merge_fields;
use crate::table::{create_backup, ProductTable};

pub const BACKUP_SUFFIX: &str = "_backup";

#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Target rows whose ID exists in the source.
    pub matched: usize,
    pub records_updated: usize,
    pub fields_updated: usize,
    pub backup: Option<PathBuf>,
}

/// Copy content from `source` rows into blank cells of `target` rows with
/// the same ID. Populated target cells are never touched.
pub fn import_by_id(source: &ProductTable, target: &mut ProductTable) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for row in 0..target.len() {
        let Some(id) = target.record(row).and_then(|r| r.id().map(str::to_string)) else {
            continue;
        };
        let Some(source_row) = source.find_by_id(&id) else {
            continue;
        };
        summary.matched += 1;

        let updates: Vec<(ContentField, String)> = ContentField::ALL
            .into_iter()
            .filter_map(|field| {
                source
                    .value(source_row, field)
                    .map(|value| (field, value.to_string()))
            })
            .collect();

        let written = merge_fields(target, row, updates)?;
        if written > 0 {
            summary.records_updated += 1;
            summary.fields_updated += written;
            info!(id = %id, fields = written, "Imported content");
        }
    }

    Ok(summary)
}

/// Import from the CSV at `source` into the CSV at `target`, in place.
/// The target is backed up first.
pub fn import_file(source: &Path, target: &Path) -> Result<ImportSummary> {
    let source_table = ProductTable::load(source)?;
    let mut target_table = ProductTable::load(target)?;
    target_table.require_column(crate::fields::ID_COLUMN)?;

    let (backup, _) = create_backup(target, BACKUP_SUFFIX)?;
    let mut summary = import_by_id(&source_table, &mut target_table)?;
    target_table.save(target)?;

    info!(
        matched = summary.matched,
        records = summary.records_updated,
        fields = summary.fields_updated,
        "Import finished"
    );
    summary.backup = Some(backup);
    Ok(summary)
}
