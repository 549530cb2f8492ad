//! Discovery of rendered documents and the heading information that travels with them.
//!
//! The converter leaves `<stem>.md` behind, optionally with a `<stem>_meta.json` sidecar
//! listing rendered headings and their bounding polygons, and a `<stem>.outline` listing when
//! the source document carried a native outline. Everything here only reads those files.

use crate::builder::strip_inline_markup;
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::toc::{HeadingDescriptor, OutlineError, OutlineReader, Toc, TocEntry};
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{fs, io};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Converter metadata sidecar; only the heading list is of interest.
#[derive(Deserialize)]
struct ConverterMeta {
    #[serde(default)]
    table_of_contents: Vec<HeadingDescriptor>,
}

/// Collects documents from files and directories, recursing into directories.
///
/// Explicit file paths are kept as given; directory entries must carry one of
/// `extensions`. The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(&path, extensions, &mut documents)?;
        } else if path.exists() {
            documents.push(path);
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
    }
    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn walk_dir(dir: &Path, extensions: &[String], documents: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, extensions, documents)?;
        } else if path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| extensions.iter().any(|e| e == ext))
        {
            documents.push(path);
        }
    }
    Ok(())
}

/// Path of the converter metadata sidecar for `document`.
#[must_use]
pub fn meta_path(document: &Path) -> PathBuf {
    sidecar(document, "_meta.json")
}

/// Path of the native outline listing for `document`.
#[must_use]
pub fn outline_path(document: &Path) -> PathBuf {
    sidecar(document, ".outline")
}

fn sidecar(document: &Path, suffix: &str) -> PathBuf {
    let stem = document_stem(document);
    document.with_file_name(format!("{stem}{suffix}"))
}

/// File name of `document` without its extension.
#[must_use]
pub fn document_stem(document: &Path) -> String {
    document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads the heading list from a converter metadata sidecar.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid metadata JSON.
pub fn load_heading_meta(path: &Path) -> Result<Vec<HeadingDescriptor>> {
    let contents = fs::read_to_string(path)?;
    let meta: ConverterMeta = serde_json::from_str(&contents)?;
    Ok(meta.table_of_contents)
}

/// Extracts heading titles from rendered markup with the format's tree-sitter query.
///
/// Descriptors found this way carry no rendered height.
///
/// # Errors
///
/// Returns an error if the grammar or query cannot be loaded, or parsing fails.
pub fn extract_headings(source: &str, format: &dyn Format) -> Result<Vec<HeadingDescriptor>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse("rendered markup".to_string()))?;

    let query = Query::new(&language, format.title_query())?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

    let mut headings = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            if let Ok(text) = capture.node.utf8_text(source.as_bytes()) {
                let title = strip_inline_markup(text).trim().to_string();
                if !title.is_empty() {
                    headings.push(HeadingDescriptor::new(title));
                }
            }
        }
    }
    Ok(headings)
}

/// Heading descriptors for `document`.
///
/// Prefers the converter metadata sidecar, which carries rendered heights; falls back to
/// the headings in the markup when the sidecar is missing or unreadable.
///
/// # Errors
///
/// Returns an error if the fallback heading extraction fails.
pub fn heading_descriptors(
    document: &Path,
    source: &str,
    format: &dyn Format,
) -> Result<Vec<HeadingDescriptor>> {
    let meta = meta_path(document);
    if meta.exists() {
        match load_heading_meta(&meta) {
            Ok(headings) => return Ok(headings),
            Err(e) => log::warn!("Ignoring unreadable metadata {}: {e}", meta.display()),
        }
    }
    extract_headings(source, format)
}

/// Reads a document's native outline from its `<stem>.outline` listing.
pub struct SidecarOutline;

impl OutlineReader for SidecarOutline {
    fn read_outline(&self, document: &Path) -> std::result::Result<Vec<TocEntry>, OutlineError> {
        let body = fs::read(document).map_err(|e| OutlineError::Corrupted(e.to_string()))?;
        if let Err(e) = std::str::from_utf8(&body) {
            return Err(OutlineError::Corrupted(format!("not a text rendering: {e}")));
        }
        let bytes = match fs::read(outline_path(document)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(OutlineError::NoOutline),
            Err(e) => return Err(OutlineError::Malformed(e.to_string())),
        };
        let text = String::from_utf8(bytes).map_err(|e| OutlineError::Malformed(e.to_string()))?;
        let toc = Toc::parse_listing(&text).map_err(|e| OutlineError::Malformed(e.to_string()))?;
        if toc.is_empty() {
            return Err(OutlineError::NoOutline);
        }
        Ok(toc.entries)
    }
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
