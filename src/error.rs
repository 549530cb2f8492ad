//! Error types shared by the TOC extractor, the tree builder and artifact output.
//!
//! Most recoverable conditions (missing outline, unmatched TOC entries, empty TOC) are logged
//! rather than returned; the variants here cover the failures a caller has to handle.

/// Result type alias for sectree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort processing of a single document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while reading inputs or writing artifacts.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Converter metadata or nested output could not be (de)serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The heading query could not be compiled for the document format.
    #[error("Query error: {0}")]
    Query(#[from] tree_sitter::QueryError),

    /// The tree-sitter grammar could not be loaded.
    #[error("Language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The rendered markdown could not be parsed at all.
    #[error("Failed to parse {0}")]
    Parse(String),

    /// A TOC listing line is not of the form `level;title`.
    #[error("Invalid TOC listing at line {line}: {reason}")]
    TocListing {
        /// 1-based line number in the listing.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// `sectree.toml` exists but could not be read as configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
