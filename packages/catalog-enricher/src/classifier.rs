//! Field-completeness classification.
//!
//! A content cell is blank when it is absent, empty, or whitespace only.
//! There is exactly one predicate for this, [`is_blank`]; everything else
//! (missing-field lists, statistics, the merge guard) is built on it.

use serde::Serialize;

use crate::fields::ContentField;
use crate::record::ProductRecord;
use crate::table::ProductTable;

/// Absent, empty, or whitespace-only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Blank content fields of a record, in field order.
pub fn missing_fields(record: &ProductRecord<'_>) -> Vec<ContentField> {
    ContentField::ALL
        .into_iter()
        .filter(|field| is_blank(record.value(*field)))
        .collect()
}

/// Per-field blank count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStat {
    pub field: ContentField,
    pub missing: usize,
    pub percentage: f64,
}

/// A row with at least one blank content field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteRecord {
    pub index: usize,
    pub id: Option<String>,
    pub brand: Option<String>,
    pub line: Option<String>,
    pub missing: Vec<ContentField>,
}

impl IncompleteRecord {
    pub fn display_name(&self) -> String {
        [self.brand.as_deref(), self.line.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text fields only; these go into the generation prompt.
    pub fn missing_text(&self) -> Vec<ContentField> {
        self.missing.iter().copied().filter(|f| f.is_text()).collect()
    }

    pub fn missing_images(&self) -> Vec<ContentField> {
        self.missing.iter().copied().filter(|f| f.is_image()).collect()
    }

    pub fn missing_video(&self) -> bool {
        self.missing.contains(&ContentField::Video)
    }
}

/// Aggregate view of what is missing across a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingReport {
    pub total_records: usize,
    pub fields: Vec<FieldStat>,
    pub incomplete: Vec<IncompleteRecord>,
}

impl MissingReport {
    pub fn total_missing_cells(&self) -> usize {
        self.fields.iter().map(|s| s.missing).sum()
    }

    pub fn incomplete_percentage(&self) -> f64 {
        percentage(self.incomplete.len(), self.total_records)
    }
}

/// Classify every row.
pub fn analyze(table: &ProductTable) -> MissingReport {
    let total = table.len();
    let mut counts = [0usize; 12];
    let mut incomplete = Vec::new();

    for record in table.records() {
        let missing = missing_fields(&record);
        for field in &missing {
            if let Some(i) = ContentField::ALL.iter().position(|f| f == field) {
                counts[i] += 1;
            }
        }
        if !missing.is_empty() {
            incomplete.push(IncompleteRecord {
                index: record.index(),
                id: record.id().map(str::to_string),
                brand: record.brand().map(str::to_string),
                line: record.line().map(str::to_string),
                missing,
            });
        }
    }

    let fields = ContentField::ALL
        .into_iter()
        .zip(counts)
        .map(|(field, missing)| FieldStat {
            field,
            missing,
            percentage: percentage(missing, total),
        })
        .collect();

    MissingReport {
        total_records: total,
        fields,
        incomplete,
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("  \t\n")));
        assert!(!is_blank(Some(" x ")));
        assert!(!is_blank(Some("0")));
    }

    #[test]
    fn test_missing_fields_in_field_order() {
        let mut table = ProductTable::new(["ID", "Brand", "Line"]);
        table.ensure_content_columns();
        table.push_row(vec!["1".into(), "Coach".into(), "Dreams".into()]);
        for field in ContentField::ALL {
            table.set(0, field, "filled").unwrap();
        }
        table.set(0, ContentField::TechSpecs, "   ").unwrap();
        table.set(0, ContentField::Image2, "").unwrap();

        let record = table.record(0).unwrap();
        assert_eq!(
            missing_fields(&record),
            vec![ContentField::Image2, ContentField::TechSpecs]
        );
    }

    #[test]
    fn test_classifier_is_idempotent() {
        let table = ProductTable::read_from(
            "ID,Brand,Line,Image 1,Video\n1,A,B,http://x.jpg,\n2,C,D,, \n".as_bytes(),
        )
        .unwrap();

        let first = analyze(&table);
        let second = analyze(&table);
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_counts_and_percentages() {
        let table = ProductTable::read_from(
            "ID,Brand,Line,Image 1\n1,A,B,http://x.jpg\n2,C,D,\n".as_bytes(),
        )
        .unwrap();

        let report = analyze(&table);
        assert_eq!(report.total_records, 2);
        assert_eq!(report.incomplete.len(), 2);

        let image1 = &report.fields[0];
        assert_eq!(image1.field, ContentField::Image1);
        assert_eq!(image1.missing, 1);
        assert!((image1.percentage - 50.0).abs() < f64::EPSILON);

        assert_eq!(report.total_missing_cells(), 1 + 2 * 11);

        let second = &report.incomplete[1];
        assert_eq!(second.display_name(), "C D");
        assert_eq!(second.missing_images().len(), 5);
        assert_eq!(second.missing_text().len(), 6);
        assert!(second.missing_video());
    }

    #[test]
    fn test_analyze_empty_table() {
        let report = analyze(&ProductTable::new(["ID"]));
        assert_eq!(report.total_records, 0);
        assert_eq!(report.incomplete_percentage(), 0.0);
    }
}
