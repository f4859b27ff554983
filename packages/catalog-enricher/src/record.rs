//! Borrowed view of one catalog row.

use crate::fields::{ContentField, BRAND_COLUMN, ID_COLUMN, LINE_COLUMN};
use crate::table::ProductTable;

/// One product row. Cheap to copy; borrows the table.
#[derive(Debug, Clone, Copy)]
pub struct ProductRecord<'a> {
    table: &'a ProductTable,
    index: usize,
}

impl<'a> ProductRecord<'a> {
    pub(crate) fn new(table: &'a ProductTable, index: usize) -> Self {
        Self { table, index }
    }

    /// 0-based row index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based row number as shown to users.
    pub fn row_number(&self) -> usize {
        self.index + 1
    }

    /// Stable identifier, if the table has an `ID` column and the cell is set.
    pub fn id(&self) -> Option<&'a str> {
        non_blank(self.table.cell(self.index, ID_COLUMN))
    }

    pub fn brand(&self) -> Option<&'a str> {
        non_blank(self.table.cell(self.index, BRAND_COLUMN))
    }

    pub fn line(&self) -> Option<&'a str> {
        non_blank(self.table.cell(self.index, LINE_COLUMN))
    }

    pub fn value(&self, field: ContentField) -> Option<&'a str> {
        self.table.value(self.index, field)
    }

    /// `"<brand> <line>"`, used for prompts and search queries.
    pub fn display_name(&self) -> String {
        match (self.brand(), self.line()) {
            (Some(brand), Some(line)) => format!("{brand} {line}"),
            (Some(brand), None) => brand.to_string(),
            (None, Some(line)) => line.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Identifier for log lines: the ID, else the row number.
    pub fn label(&self) -> String {
        match self.id() {
            Some(id) => format!("ID {id}"),
            None => format!("row {}", self.row_number()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_accessors() {
        let table = ProductTable::read_from(
            "ID,Brand,Line\n 42 ,Coach, Dreams (L) EDP 90ml \n,,Orphan\n".as_bytes(),
        )
        .unwrap();

        let first = table.record(0).unwrap();
        assert_eq!(first.id(), Some("42"));
        assert_eq!(first.display_name(), "Coach Dreams (L) EDP 90ml");
        assert_eq!(first.label(), "ID 42");

        let second = table.record(1).unwrap();
        assert_eq!(second.id(), None);
        assert_eq!(second.brand(), None);
        assert_eq!(second.display_name(), "Orphan");
        assert_eq!(second.label(), "row 2");

        assert!(table.record(2).is_none());
    }
}
