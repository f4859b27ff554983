//! Typed errors for the enrichment library.
//!
//! Library modules return these; the binary wraps them in `anyhow` with
//! context at the edges.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from adapters and pipelines.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Generative text service failed
    #[error("generation failed: {0}")]
    Generation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Image or video search backend failed
    #[error("search failed: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Link existence check could not be performed
    #[error("link check failed for {url}: {source}")]
    LinkCheck {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Table load/save failed
    #[error(transparent)]
    Table(#[from] TableError),

    /// Report file I/O failed
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Outbound call took longer than the request timeout
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Run interrupted while a call was in flight
    #[error("operation cancelled")]
    Cancelled,
}

/// Errors from the tabular store.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("row {row} out of range (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
}

/// Result type alias for enrichment operations.
pub type Result<T> = std::result::Result<T, EnrichError>;

/// Result type alias for table operations.
pub type TableResult<T> = std::result::Result<T, TableError>;
