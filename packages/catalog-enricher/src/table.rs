//! In-memory product table backed by a CSV file.
//!
//! Columns are always resolved by header name. Content columns that the
//! file lacks are appended on load so every merge has a target cell.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{TableError, TableResult};
use crate::fields::{ContentField, ID_COLUMN, LINE_COLUMN};
use crate::record::ProductRecord;

/// A loaded catalog: header row plus string cells.
#[derive(Debug, Clone, Default)]
pub struct ProductTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: HashMap<String, usize>,
}

impl ProductTable {
    /// Create an empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for header in headers {
            table.push_column(header.into());
        }
        table
    }

    /// Load a CSV file and make sure every content column exists.
    pub fn load(path: impl AsRef<Path>) -> TableResult<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::read_from(file).map_err(|source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), rows = table.len(), "Loaded catalog");
        Ok(table)
    }

    /// Parse CSV from any reader.
    pub fn read_from<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self::new(rdr.headers()?.iter().map(str::to_string));
        for record in rdr.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect());
        }
        table.ensure_content_columns();
        Ok(table)
    }

    /// Append any missing content columns, empty for every row.
    pub fn ensure_content_columns(&mut self) {
        for field in ContentField::ALL {
            if self.column_index(field.column()).is_none() {
                debug!(column = field.column(), "Adding missing content column");
                self.push_column(field.column().to_string());
            }
        }
    }

    fn push_column(&mut self, header: String) {
        let index = self.headers.len();
        self.columns.entry(header.trim().to_string()).or_insert(index);
        self.headers.push(header);
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    /// Append a row, padded to the header width. Cells past the last header
    /// get unnamed columns so a save writes them back out.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        if cells.len() > self.headers.len() {
            warn!(
                row = self.rows.len() + 1,
                extra = cells.len() - self.headers.len(),
                "Row is wider than the header; keeping extra cells in unnamed columns"
            );
            while self.headers.len() < cells.len() {
                self.push_column(String::new());
            }
        }
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name.trim()).copied()
    }

    pub fn require_column(&self, name: &str) -> TableResult<usize> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Raw cell by column name. `None` when the row or column is absent.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Content field cell.
    pub fn value(&self, row: usize, field: ContentField) -> Option<&str> {
        self.cell(row, field.column())
    }

    /// Overwrite a content cell unconditionally. Callers that must respect
    /// existing content go through [`crate::merge`].
    pub fn set(&mut self, row: usize, field: ContentField, value: impl Into<String>) -> TableResult<()> {
        let col = self.require_column(field.column())?;
        let len = self.rows.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfRange { row, len })?;
        cells[col] = value.into();
        Ok(())
    }

    pub fn record(&self, row: usize) -> Option<ProductRecord<'_>> {
        (row < self.rows.len()).then(|| ProductRecord::new(self, row))
    }

    pub fn records(&self) -> impl Iterator<Item = ProductRecord<'_>> {
        (0..self.rows.len()).map(move |row| ProductRecord::new(self, row))
    }

    /// First row whose `ID` matches (trimmed). `None` if the table has no ID column.
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.find_by(ID_COLUMN, id)
    }

    /// First row whose `Line` matches (trimmed).
    pub fn find_by_line(&self, line: &str) -> Option<usize> {
        self.find_by(LINE_COLUMN, line)
    }

    fn find_by(&self, column: &str, needle: &str) -> Option<usize> {
        let col = self.column_index(column)?;
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .position(|row| row.get(col).map(|c| c.trim()) == Some(needle))
    }

    /// Write the whole table as CSV.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Save to `path`, replacing it. Writes a sibling temp file first and
    /// renames it over the target so an interrupt never leaves half a file.
    pub fn save(&self, path: impl AsRef<Path>) -> TableResult<()> {
        let path = path.as_ref();
        let tmp = temp_sibling(path);
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = fs::File::create(&tmp).map_err(io_err)?;
        self.write_to(file).map_err(|source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(io_err)?;

        debug!(path = %path.display(), rows = self.len(), "Saved catalog");
        Ok(())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// `catalog.csv` + `_backup` → `catalog_backup.csv`.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    path.with_file_name(format!("{stem}{suffix}.{ext}"))
}

/// Copy `path` to its backup name unless a backup already exists.
///
/// Returns the backup path and whether it was written by this call.
pub fn create_backup(path: &Path, suffix: &str) -> TableResult<(PathBuf, bool)> {
    let backup = backup_path(path, suffix);
    if backup.exists() {
        info!(backup = %backup.display(), "Backup already exists");
        return Ok((backup, false));
    }
    fs::copy(path, &backup).map_err(|source| TableError::Io {
        path: backup.clone(),
        source,
    })?;
    info!(backup = %backup.display(), "Backup created");
    Ok((backup, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "ID,Brand,Line,Image 1,Video\n\
                       36618,Lalique,Satine (L) EDP 100ml,http://a.jpg,\n\
                       37130,Montblanc,Signature (L) EDP 30ml\n";

    #[test]
    fn test_read_pads_short_rows_and_adds_content_columns() {
        let table = ProductTable::read_from(CSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers().len(), 3 + ContentField::ALL.len());
        assert_eq!(table.value(0, ContentField::Image1), Some("http://a.jpg"));
        assert_eq!(table.value(1, ContentField::Image1), Some(""));
        assert_eq!(table.value(1, ContentField::TechSpecs), Some(""));
    }

    #[test]
    fn test_find_by_id_and_line() {
        let table = ProductTable::read_from(CSV.as_bytes()).unwrap();
        assert_eq!(table.find_by_id("37130"), Some(1));
        assert_eq!(table.find_by_id(" 36618 "), Some(0));
        assert_eq!(table.find_by_line("Satine (L) EDP 100ml"), Some(0));
        assert_eq!(table.find_by_id(""), None);
        assert_eq!(table.find_by_id("1"), None);
    }

    #[test]
    fn test_find_by_id_without_id_column() {
        let table = ProductTable::read_from("Brand,Line\nA,B\n".as_bytes()).unwrap();
        assert_eq!(table.find_by_id("1"), None);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut table = ProductTable::read_from(CSV.as_bytes()).unwrap();
        let err = table.set(5, ContentField::Video, "x").unwrap_err();
        assert!(matches!(err, TableError::RowOutOfRange { row: 5, len: 2 }));
    }

    #[test]
    fn test_write_round_trips_cells() {
        let mut table = ProductTable::read_from(CSV.as_bytes()).unwrap();
        table
            .set(1, ContentField::Headline, "Line one,\n\"quoted\"")
            .unwrap();

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let reloaded = ProductTable::read_from(out.as_slice()).unwrap();

        assert_eq!(reloaded.headers(), table.headers());
        assert_eq!(
            reloaded.value(1, ContentField::Headline),
            Some("Line one,\n\"quoted\"")
        );
    }

    #[test]
    fn test_wide_row_keeps_extra_cells() {
        let table = ProductTable::read_from("ID,Line\n1,A,extra,more\n2,B\n".as_bytes()).unwrap();

        assert_eq!(table.headers()[..4], ["ID", "Line", "", ""]);
        assert_eq!(table.cell(0, LINE_COLUMN), Some("A"));
        assert_eq!(table.value(0, ContentField::Headline), Some(""));

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines().skip(1);
        assert!(lines.next().unwrap().starts_with("1,A,extra,more,"));
        assert!(lines.next().unwrap().starts_with("2,B,,,"));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/data/catalog.csv"), "_backup"),
            PathBuf::from("/data/catalog_backup.csv")
        );
        assert_eq!(
            backup_path(Path::new("sheet (1).csv"), "_backup_regen"),
            PathBuf::from("sheet (1)_backup_regen.csv")
        );
    }
}
