//! Format trait and implementations for rendered document types.
//!
//! This module defines the `Format` trait which abstracts over the markup a converter may
//! render to by providing the tree-sitter grammar and heading query for it. Headings found
//! this way feed the TOC heuristics when the converter left no heading metadata behind.

pub mod markdown;

/// Tree-sitter grammar and queries for one rendered format.
pub trait Format {
    /// Grammar used to parse rendered documents.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing heading titles as `@title`.
    fn title_query(&self) -> &str;
}
