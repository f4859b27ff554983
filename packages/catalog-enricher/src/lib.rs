//! Product Catalog Enrichment Library
//!
//! Fills the blank marketing-copy and media cells of a product catalog CSV
//! from a generative text service and web image/video search, without ever
//! overwriting a populated cell.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_enricher::{Enricher, MediaFinder, RegenerateOptions};
//! use catalog_enricher::testing::{MockGenerator, MockImageSearch, MockLinkChecker, MockVideoSearch};
//!
//! let links = Arc::new(MockLinkChecker::new());
//! let media = MediaFinder::new(Arc::new(MockImageSearch::new()), Arc::new(MockVideoSearch::new()), links.clone());
//! let enricher = Enricher::new(Arc::new(MockGenerator::new()), media, links);
//!
//! let summary = enricher.regenerate(Path::new("catalog.csv"), RegenerateOptions::default()).await?;
//! ```
//!
//! # Modules
//!
//! - [`table`] / [`record`] - CSV-backed product table, columns by header name
//! - [`classifier`] - Blank-field detection and missing-data statistics
//! - [`prompts`] / [`parse`] - Prompt building and section parsing
//! - [`media`] - Image/video search with live link validation
//! - [`merge`] - Fill-only-blank merge policy
//! - [`checkpoint`] / [`report`] - Resumable results report
//! - [`pipeline`] - Sequential runs (catalog, regenerate, list, import, apply-report, validate)
//! - [`adapters`] - Gemini, Google Custom Search, YouTube and HTTP implementations
//! - [`testing`] - Mock implementations for testing

pub mod adapters;
pub mod checkpoint;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fields;
pub mod generation;
pub mod media;
pub mod merge;
pub mod parse;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod report;
pub mod security;
pub mod table;
pub mod testing;
pub mod traits;

// Re-export core types at crate root
pub use classifier::{analyze, is_blank, missing_fields, IncompleteRecord, MissingReport};
pub use config::{Config, Credentials};
pub use error::{EnrichError, Result, TableError};
pub use fields::ContentField;
pub use generation::{GenerationResult, MediaResult};
pub use media::MediaFinder;
pub use merge::{apply_generation, merge_fields};
pub use pipeline::{
    CatalogOptions, Enricher, RegenerateOptions, RegenerateSummary, RowSelection, RunSummary,
};
pub use record::ProductRecord;
pub use report::{parse_report, ReportBlock, ReportOutcome, ReportWriter};
pub use security::SecretString;
pub use table::ProductTable;
pub use traits::{ContentGenerator, ImageSearch, LinkChecker, LinkStatus, VideoSearch};
