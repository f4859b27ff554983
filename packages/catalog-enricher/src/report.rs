//! Human-readable results report.
//!
//! The report doubles as the checkpoint for catalog runs, so every block is
//! flushed as soon as it is written. Block layout:
//!
//! ```text
//! PRODUCT 3: Lalique Satine (L) EDP 100ml
//! --------------------------------------------------
//! Status: success
//!
//! DESCRIPTION:
//! ...
//!
//! WORKING IMAGE LINKS:
//! Image 1: https://...
//!
//! VIDEO LINK:
//! Video: https://www.youtube.com/watch?v=...
//!
//!
//! ============================================================
//! ```

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::debug;

use crate::checkpoint::FileMode;
use crate::fields::ContentField;
use crate::generation::GenerationResult;
use crate::parse::parse_sections;
use crate::pipeline::RunSummary;

/// Separator between blocks; also closes the header.
pub const RULE: &str = "============================================================";

const BLOCK_RULE: &str = "--------------------------------------------------";

const CATALOG_TITLE: &str = "GEMINI API RESULTS WITH WORKING LINKS FOR BEAUTY PRODUCTS";
const PRODUCT_LIST_TITLE: &str = "PRODUCT LIST REGENERATION RESULTS";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header written when a report is started fresh.
#[derive(Debug, Clone)]
pub enum ReportHeader {
    Catalog,
    ProductList {
        generated_on: DateTime<Local>,
        total: usize,
    },
}

impl ReportHeader {
    fn render(&self) -> String {
        match self {
            ReportHeader::Catalog => format!("{CATALOG_TITLE}\n{RULE}\n\n"),
            ReportHeader::ProductList {
                generated_on,
                total,
            } => format!(
                "{PRODUCT_LIST_TITLE}\nGenerated on: {}\nTotal products: {total}\n{RULE}\n\n",
                generated_on.format(TIMESTAMP_FORMAT)
            ),
        }
    }
}

/// Outcome for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Success {
        description: String,
        images: Vec<String>,
        video: Option<String>,
    },
    Error(String),
}

impl ReportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReportOutcome::Success { .. })
    }
}

/// Render one product block, separator included.
pub fn render_block(number: usize, name: &str, outcome: &ReportOutcome) -> String {
    let status = if outcome.is_success() { "success" } else { "error" };
    let mut out = format!("PRODUCT {number}: {name}\n{BLOCK_RULE}\nStatus: {status}\n\n");

    match outcome {
        ReportOutcome::Success {
            description,
            images,
            video,
        } => {
            out.push_str("DESCRIPTION:\n");
            out.push_str(description);
            out.push_str("\n\nWORKING IMAGE LINKS:\n");
            if images.is_empty() {
                out.push_str("No working image links found\n");
            }
            for (i, url) in images.iter().enumerate() {
                out.push_str(&format!("Image {}: {url}\n", i + 1));
            }
            out.push_str("\nVIDEO LINK:\n");
            match video {
                Some(url) => out.push_str(&format!("Video: {url}\n")),
                None => out.push_str("No video found\n"),
            }
        }
        ReportOutcome::Error(message) => {
            out.push_str("ERROR:\n");
            out.push_str(message);
        }
    }

    out.push_str(&format!("\n\n{RULE}\n\n"));
    out
}

/// Append-only writer for a report file.
pub struct ReportWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl ReportWriter {
    /// Open `path`. Truncate mode starts a new file with `header`; append
    /// mode continues the existing one (creating it if needed).
    pub fn open(path: &Path, mode: FileMode, header: &ReportHeader) -> io::Result<Self> {
        let file = match mode {
            FileMode::Truncate => File::create(path)?,
            FileMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
        };
        let mut writer = Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        };
        if mode == FileMode::Truncate {
            writer.out.write_all(header.render().as_bytes())?;
            writer.out.flush()?;
        }
        debug!(path = %path.display(), ?mode, "Opened report");
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write and flush one product block.
    pub fn write_block(&mut self, number: usize, name: &str, outcome: &ReportOutcome) -> io::Result<()> {
        self.out
            .write_all(render_block(number, name, outcome).as_bytes())?;
        self.out.flush()
    }

    /// Append the processing summary footer.
    pub fn write_summary(&mut self, summary: &RunSummary, finished_at: DateTime<Local>) -> io::Result<()> {
        let footer = format!(
            "\n{RULE}\nPROCESSING SUMMARY\n{RULE}\n\
             Total products processed: {}\n\
             Successful: {}\n\
             Failed: {}\n\
             Total images found: {}\n\
             Total videos found: {}\n\
             Processing completed at: {}\n",
            summary.processed,
            summary.successful,
            summary.failed,
            summary.images,
            summary.videos,
            finished_at.format(TIMESTAMP_FORMAT),
        );
        self.out.write_all(footer.as_bytes())?;
        self.out.flush()
    }
}

/// One successful block read back from a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlock {
    pub number: u32,
    pub name: String,
    pub text: BTreeMap<ContentField, String>,
    pub images: Vec<String>,
    pub video: Option<String>,
}

impl ReportBlock {
    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || !self.images.is_empty() || self.video.is_some()
    }

    pub fn to_generation(&self) -> GenerationResult {
        GenerationResult {
            text: self.text.clone(),
            images: self.images.clone(),
            video: self.video.clone(),
        }
    }
}

/// Read successful blocks back out of a report. Error blocks are skipped.
pub fn parse_report(text: &str) -> Vec<ReportBlock> {
    let text = text.replace("\r\n", "\n");
    let (Ok(product_re), Ok(image_re), Ok(video_re)) = (
        Regex::new(r"PRODUCT (\d+): ([^\n]+)"),
        Regex::new(r"Image \d+: (https?://\S+)"),
        Regex::new(r"Video: (https?://\S+)"),
    ) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    for section in text.split(RULE) {
        let Some(caps) = product_re.captures(section) else {
            continue;
        };
        let (Some(number), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Ok(number) = number.as_str().parse::<u32>() else {
            continue;
        };
        let name = name.as_str().trim().to_string();

        if section.contains("Status: error") {
            debug!(product = %name, "Skipping error block");
            continue;
        }

        let images_at = section.find("WORKING IMAGE LINKS:");
        let video_at = section.find("VIDEO LINK:");

        let description = section
            .find("DESCRIPTION:\n")
            .map(|start| {
                let body = start + "DESCRIPTION:\n".len();
                let end = images_at.or(video_at).filter(|end| *end >= body).unwrap_or(section.len());
                &section[body..end]
            })
            .unwrap_or("");

        let images = images_at
            .map(|start| {
                let end = video_at.filter(|end| *end > start).unwrap_or(section.len());
                image_re
                    .captures_iter(&section[start..end])
                    .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let video = video_at.and_then(|start| {
            video_re
                .captures(&section[start..])
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        });

        blocks.push(ReportBlock {
            number,
            name,
            text: parse_sections(description, &ContentField::TEXT),
            images,
            video,
        });
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> ReportOutcome {
        ReportOutcome::Success {
            description: "**1. Captivating Headline:**\nНощен блясък".to_string(),
            images: vec!["https://a.com/1.jpg".into(), "https://a.com/2.png".into()],
            video: Some("https://www.youtube.com/watch?v=xyz".into()),
        }
    }

    #[test]
    fn test_render_success_block() {
        let block = render_block(4, "Coach Dreams", &success());
        assert!(block.starts_with("PRODUCT 4: Coach Dreams\n--------------------------------------------------\nStatus: success\n\nDESCRIPTION:\n"));
        assert!(block.contains("WORKING IMAGE LINKS:\nImage 1: https://a.com/1.jpg\nImage 2: https://a.com/2.png\n\nVIDEO LINK:\nVideo: https://www.youtube.com/watch?v=xyz\n"));
        assert!(block.ends_with(&format!("\n\n{RULE}\n\n")));
    }

    #[test]
    fn test_render_empty_media_and_error() {
        let empty = ReportOutcome::Success {
            description: "text".into(),
            images: vec![],
            video: None,
        };
        let block = render_block(1, "X", &empty);
        assert!(block.contains("No working image links found\n"));
        assert!(block.contains("No video found\n"));

        let error = render_block(2, "Y", &ReportOutcome::Error("quota exceeded".into()));
        assert!(error.contains("Status: error\n\nERROR:\nquota exceeded\n\n"));
        assert!(!error.contains("DESCRIPTION"));
    }

    #[test]
    fn test_writer_truncate_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        let mut writer = ReportWriter::open(&path, FileMode::Truncate, &ReportHeader::Catalog).unwrap();
        writer.write_block(1, "A", &success()).unwrap();
        drop(writer);

        let mut writer = ReportWriter::open(&path, FileMode::Append, &ReportHeader::Catalog).unwrap();
        writer.write_block(2, "B", &ReportOutcome::Error("boom".into())).unwrap();
        drop(writer);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(&format!("{CATALOG_TITLE}\n{RULE}\n\nPRODUCT 1: A\n")));
        assert_eq!(text.matches(CATALOG_TITLE).count(), 1);
        assert!(text.contains("PRODUCT 2: B\n"));
    }

    #[test]
    fn test_parse_report_reads_success_blocks_only() {
        let mut text = ReportHeader::Catalog.render();
        text.push_str(&render_block(1, "Coach Dreams", &success()));
        text.push_str(&render_block(2, "Broken", &ReportOutcome::Error("boom".into())));

        let blocks = parse_report(&text);

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.number, 1);
        assert_eq!(block.name, "Coach Dreams");
        assert_eq!(block.images, vec!["https://a.com/1.jpg", "https://a.com/2.png"]);
        assert_eq!(block.video.as_deref(), Some("https://www.youtube.com/watch?v=xyz"));
        assert_eq!(block.text[&ContentField::Headline], "Нощен блясък");
        assert!(block.has_content());
    }

    #[test]
    fn test_product_list_header() {
        let header = ReportHeader::ProductList {
            generated_on: Local::now(),
            total: 7,
        };
        let text = header.render();
        assert!(text.starts_with("PRODUCT LIST REGENERATION RESULTS\nGenerated on: "));
        assert!(text.contains("Total products: 7\n"));
        // The title must never look like a checkpoint marker.
        assert_eq!(crate::checkpoint::last_marker(&text), 0);
    }
}
