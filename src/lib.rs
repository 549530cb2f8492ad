//! sectree: turn rendered documents into section trees.
//!
//! A converter renders a document to markdown; this crate aligns the rendered headings with
//! the document's table of contents (embedded, or inferred from the headings) and builds a
//! tree of sections holding the text and tables that belong to each.

pub mod builder;
pub mod config;
pub mod error;
pub mod formats;
pub mod input;
pub mod output;
pub mod section;
pub mod similarity;
pub mod toc;

use crate::builder::TreeBuilder;
use crate::error::Result;
use crate::formats::markdown::MarkdownFormat;
use crate::section::SectionTree;
use crate::toc::{OutlineReader, Toc};
use std::fs;
use std::path::{Path, PathBuf};

/// Derives the TOC for a rendered markdown document and builds its section tree.
///
/// `toc` replaces extraction when the caller already has a listing. The body is read lossily
/// so a partially corrupted rendering still yields a partial tree.
///
/// # Errors
///
/// Returns an error if the document cannot be read or heading extraction fails.
pub fn parse_document(
    document: &Path,
    reader: &dyn OutlineReader,
    toc: Option<Toc>,
    threshold: f64,
) -> Result<(Toc, SectionTree)> {
    let body = String::from_utf8_lossy(&fs::read(document)?).into_owned();
    let toc = match toc {
        Some(toc) => toc,
        None => {
            let headings = input::heading_descriptors(document, &body, &MarkdownFormat)?;
            crate::toc::extract_toc(document, reader, &headings)
        }
    };
    log::info!("{}: {} TOC entries", document.display(), toc.len());
    let tree = TreeBuilder::new(&toc)
        .with_threshold(threshold)
        .build(document, &body);
    Ok((toc, tree))
}

/// Parses a document and writes its artifacts under `output_dir`.
///
/// # Errors
///
/// Returns an error if parsing fails or the artifacts cannot be written.
pub fn process_document(
    document: &Path,
    reader: &dyn OutlineReader,
    toc: Option<Toc>,
    threshold: f64,
    output_dir: &Path,
) -> Result<PathBuf> {
    let (toc, tree) = parse_document(document, reader, toc, threshold)?;
    output::write_artifacts(output_dir, &toc, &tree)
}

#[cfg(test)]
#[path = "tests/lib.rs"]
mod tests;
