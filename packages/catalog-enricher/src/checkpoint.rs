//! Resume point for long catalog runs.
//!
//! The report file is the only persisted state. The last processed product
//! is the highest `PRODUCT N:` marker in it. A block cut off before its
//! marker was written is not detected and gets processed again.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use regex::Regex;
use tracing::{info, warn};

/// How the report file is opened for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Start a new report (header written).
    Truncate,
    /// Continue an existing report.
    Append,
}

/// Highest product number recorded in `text`, or 0.
pub fn last_marker(text: &str) -> u32 {
    let Ok(re) = Regex::new(r"PRODUCT (\d+):") else {
        return 0;
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Highest product number recorded in the report at `path`.
///
/// A missing file means 0. So does an unreadable one, after a warning.
pub fn last_processed(path: &Path) -> u32 {
    match fs::read_to_string(path) {
        Ok(text) => last_marker(&text),
        Err(e) if e.kind() == ErrorKind::NotFound => 0,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read existing report");
            0
        }
    }
}

/// Where a run starts and how it opens the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePlan {
    /// 0-based index of the first product to process.
    pub start_index: usize,
    pub mode: FileMode,
}

impl ResumePlan {
    pub fn fresh() -> Self {
        Self {
            start_index: 0,
            mode: FileMode::Truncate,
        }
    }

    /// Decide from the prior report, the resume flag and an explicit
    /// 1-based start. An explicit start wins over the report.
    pub fn decide(report: &Path, resume: bool, start_from: Option<usize>) -> Self {
        if let Some(n) = start_from.filter(|n| *n >= 1) {
            info!(start_from = n, "Forcing start position");
            return Self {
                start_index: n - 1,
                mode: FileMode::Append,
            };
        }

        if resume {
            let last = last_processed(report);
            if last > 0 {
                info!(last_processed = last, next = last + 1, "Resuming from existing report");
                return Self {
                    start_index: last as usize,
                    mode: FileMode::Append,
                };
            }
        }

        info!("Starting fresh");
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_marker_takes_max() {
        let text = "PRODUCT 3: a\nPRODUCT 12: b\nPRODUCT 7: c\nPRODUCT x: d";
        assert_eq!(last_marker(text), 12);
        assert_eq!(last_marker("no markers"), 0);
        assert_eq!(last_marker("PRODUCT 5 without colon"), 0);
    }

    #[test]
    fn test_missing_report_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");

        assert_eq!(last_processed(&path), 0);
        assert_eq!(ResumePlan::decide(&path, true, None), ResumePlan::fresh());
    }

    #[test]
    fn test_resume_and_explicit_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        fs::write(&path, "PRODUCT 1: a\nPRODUCT 2: b\n").unwrap();

        assert_eq!(
            ResumePlan::decide(&path, true, None),
            ResumePlan {
                start_index: 2,
                mode: FileMode::Append
            }
        );
        assert_eq!(ResumePlan::decide(&path, false, None), ResumePlan::fresh());
        assert_eq!(
            ResumePlan::decide(&path, true, Some(10)),
            ResumePlan {
                start_index: 9,
                mode: FileMode::Append
            }
        );
        // Zero is not a valid 1-based position.
        assert_eq!(ResumePlan::decide(&path, false, Some(0)), ResumePlan::fresh());
    }
}
