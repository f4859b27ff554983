//! Merge generated content into a table row without touching populated cells.
//!
//! The blank check happens here, at write time, not only when the row was
//! classified. A cell that gained content between classification and merge
//! is left alone.
//!
//! Image policy: validated URLs fill the image slots that were classified
//! missing, lowest slot first. URL[0] goes to the lowest missing slot,
//! URL[1] to the next one, and so on. Surplus URLs are dropped. A URL the
//! row already holds in any image slot is never written a second time.

use std::collections::HashSet;

use tracing::debug;

use crate::classifier::is_blank;
use crate::error::TableResult;
use crate::fields::ContentField;
use crate::generation::GenerationResult;
use crate::table::ProductTable;

/// Write each `(field, value)` whose cell is blank now and whose value is
/// not blank. Key-matched. Returns the number of cells written.
pub fn merge_fields<I, S>(table: &mut ProductTable, row: usize, updates: I) -> TableResult<usize>
where
    I: IntoIterator<Item = (ContentField, S)>,
    S: AsRef<str>,
{
    let mut written = 0;
    for (field, value) in updates {
        if write_if_blank(table, row, field, value.as_ref())? {
            written += 1;
        }
    }
    Ok(written)
}

/// Apply a generation result to a row classified with `missing`.
///
/// Returns the number of fields actually updated.
pub fn apply_generation(
    table: &mut ProductTable,
    row: usize,
    missing: &[ContentField],
    result: &GenerationResult,
) -> TableResult<usize> {
    let mut updated = 0;

    for (field, value) in &result.text {
        if field.is_text() && missing.contains(field) && write_if_blank(table, row, *field, value)? {
            updated += 1;
        }
    }

    let images = new_images(table, row, &result.images);
    for (field, url) in image_assignments(missing, &images) {
        if write_if_blank(table, row, field, url)? {
            updated += 1;
        }
    }

    if let Some(video) = &result.video {
        if missing.contains(&ContentField::Video)
            && write_if_blank(table, row, ContentField::Video, video)?
        {
            updated += 1;
        }
    }

    debug!(row, updated, "Merged generation result");
    Ok(updated)
}

/// Pair URLs with the missing image slots in ascending slot order.
pub fn image_assignments<'a>(
    missing: &[ContentField],
    urls: &'a [String],
) -> Vec<(ContentField, &'a str)> {
    let mut slots: Vec<ContentField> = missing.iter().copied().filter(|f| f.is_image()).collect();
    slots.sort();
    slots.dedup();
    slots
        .into_iter()
        .zip(urls.iter().map(String::as_str))
        .collect()
}

/// URLs not already present in the row's image cells, first occurrence only.
fn new_images(table: &ProductTable, row: usize, urls: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = ContentField::IMAGES
        .into_iter()
        .filter_map(|field| table.value(row, field))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();

    urls.iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .filter(|url| seen.insert(url.to_string()))
        .map(str::to_string)
        .collect()
}

fn write_if_blank(
    table: &mut ProductTable,
    row: usize,
    field: ContentField,
    value: &str,
) -> TableResult<bool> {
    let value = value.trim();
    if value.is_empty() || !is_blank(table.value(row, field)) {
        return Ok(false);
    }
    table.set(row, field, value)?;
    Ok(true)
}
