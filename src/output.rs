//! Flat and nested views of a finished section tree, and the artifacts written per document.
//!
//! Every document gets its own folder under the output directory holding `toc.txt` (the TOC
//! listing), `output.txt` (the flat view) and `output_tree.json` (the nested view).

use crate::error::Result;
use crate::input::document_stem;
use crate::section::{Content, SectionId, SectionTree};
use crate::toc::Toc;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// TOC listing file name.
pub const TOC_FILE: &str = "toc.txt";
/// Flat view file name.
pub const FLAT_FILE: &str = "output.txt";
/// Nested view file name.
pub const TREE_FILE: &str = "output_tree.json";

/// Renders the tree in pre-order, each section's heading path followed by its content.
#[must_use]
pub fn flat_view(tree: &SectionTree) -> String {
    let mut out = String::new();
    for id in tree.preorder() {
        let _ = writeln!(out, "[{}]", tree.heading_path(id).join(" > "));
        for item in &tree.get(id).content {
            let rendered = item.render();
            out.push_str(&rendered);
            if !rendered.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

/// Nested view of one section: `{ heading: { "content": [..], "children": [..] } }`.
#[derive(Debug, PartialEq)]
pub struct NestedView {
    /// Section heading, used as the single key.
    pub heading: String,
    /// Rendered content items in order.
    pub content: Vec<String>,
    /// Children in encounter order.
    pub children: Vec<NestedView>,
}

#[derive(Serialize)]
struct NestedBody<'a> {
    content: &'a [String],
    children: &'a [NestedView],
}

impl Serialize for NestedView {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.heading,
            &NestedBody {
                content: &self.content,
                children: &self.children,
            },
        )?;
        map.end()
    }
}

impl NestedView {
    /// Builds the nested view rooted at the tree's root.
    #[must_use]
    pub fn from_tree(tree: &SectionTree) -> Self {
        Self::from_section(tree, tree.root())
    }

    fn from_section(tree: &SectionTree, id: SectionId) -> Self {
        let section = tree.get(id);
        Self {
            heading: section.title.clone(),
            content: section.content.iter().map(Content::render).collect(),
            children: section
                .children_indices
                .iter()
                .map(|&child| Self::from_section(tree, child))
                .collect(),
        }
    }

    /// Pretty-printed JSON of the view.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Folder receiving the artifacts of `document`.
#[must_use]
pub fn artifact_dir(output_dir: &Path, document: &Path) -> PathBuf {
    output_dir.join(document_stem(document))
}

/// Writes the TOC listing, flat view and nested view for one document.
///
/// Directories are created as needed; existing artifacts are overwritten. Returns the folder
/// the artifacts were written to.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub fn write_artifacts(output_dir: &Path, toc: &Toc, tree: &SectionTree) -> Result<PathBuf> {
    let dir = artifact_dir(output_dir, tree.source());
    fs::create_dir_all(&dir)?;

    let toc_path = dir.join(TOC_FILE);
    fs::write(&toc_path, toc.to_listing())?;
    log::info!("Saved TOC to {}", toc_path.display());

    let flat_path = dir.join(FLAT_FILE);
    fs::write(&flat_path, flat_view(tree))?;
    log::info!("Saved text dump to {}", flat_path.display());

    let tree_path = dir.join(TREE_FILE);
    fs::write(&tree_path, NestedView::from_tree(tree).to_json()?)?;
    log::info!("Saved JSON tree to {}", tree_path.display());

    Ok(dir)
}

#[cfg(test)]
#[path = "tests/output.rs"]
mod tests;
