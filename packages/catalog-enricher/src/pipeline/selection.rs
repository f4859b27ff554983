use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid row '{0}': rows are 1-based numbers")]
    InvalidRow(String),

    #[error("invalid range '{0}': start must not exceed end")]
    InvalidRange(String),

    #[error("empty row selection")]
    Empty,
}

/// A set of 1-based spreadsheet rows, written like `108-118,120-245,745`.
///
/// Kept as ranges, so the size of a range costs nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelection {
    /// Sorted, non-overlapping, non-adjacent ranges of 0-based row indices.
    ranges: Vec<RangeInclusive<usize>>,
}

impl RowSelection {
    fn from_ranges(mut ranges: Vec<RangeInclusive<usize>>) -> Self {
        ranges.sort_by_key(|r| *r.start());
        let mut merged: Vec<RangeInclusive<usize>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*range.end());
                    *last = *last.start()..=end;
                }
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    /// Whether 0-based row `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(&index))
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| (r.end() - r.start()).saturating_add(1))
            .fold(0, usize::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn parse_row(raw: &str) -> Result<usize, SelectionError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| SelectionError::InvalidRow(raw.trim().to_string()))
}

impl FromStr for RowSelection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_row(start)?, parse_row(end)?);
                    if start > end {
                        return Err(SelectionError::InvalidRange(part.to_string()));
                    }
                    ranges.push(start - 1..=end - 1);
                }
                None => {
                    let row = parse_row(part)? - 1;
                    ranges.push(row..=row);
                }
            }
        }
        if ranges.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(Self::from_ranges(ranges))
    }
}

impl fmt::Display for RowSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows", self.len())
    }
}
