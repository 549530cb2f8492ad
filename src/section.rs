//! Section representation for documents aligned against a table of contents.
//!
//! A section represents a hierarchical division of a document, started by a heading that
//! matched a TOC entry. Sections live in an arena owned by [`SectionTree`] and refer to each
//! other by [`SectionId`]: a section owns the ordered list of its children's ids and holds a
//! non-owning id for its parent, which is only used for upward lookups.

use std::path::{Path, PathBuf};

/// Heading given to the synthetic root section.
pub const ROOT_HEADING: &str = "root";

/// Stable index of a section inside its [`SectionTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectionId(usize);

#[derive(Clone, Debug, PartialEq)]
/// A block of body content attached to a section, in document order.
pub enum Content {
    /// Free text accumulated between boundaries, one `\n` per line.
    Text(String),
    /// A contiguous markdown table block.
    Table {
        /// Raw table rows, each ending in `\n`.
        markdown: String,
        /// Adjacent "Table N" / "Figure N" line, empty when none was found.
        caption: String,
    },
}

impl Content {
    /// Textual form used by the serialisers.
    ///
    /// Tables render as their caption line (when present) followed by the raw block.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Table { markdown, caption } if caption.is_empty() => markdown.clone(),
            Self::Table { markdown, caption } => format!("{caption}\n{markdown}"),
        }
    }
}

#[derive(Clone, Debug)]
/// Hierarchical document division created when a heading boundary is accepted.
pub struct Section {
    /// Section heading text as rendered in the body.
    pub title: String,
    /// Level assigned by the TOC entry this section matched (0 for the root).
    pub level: u32,
    /// Text and tables in the order they were flushed.
    pub content: Vec<Content>,
    /// Index of the containing section in the hierarchy.
    pub parent_index: Option<SectionId>,
    /// Indices of directly nested subsections, in encounter order.
    pub children_indices: Vec<SectionId>,
}

/// Arena of sections rooted at a synthetic level-0 section.
#[derive(Clone, Debug)]
pub struct SectionTree {
    sections: Vec<Section>,
    source: PathBuf,
}

impl SectionTree {
    /// Creates a tree holding only the root section for `source`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            sections: vec![Section {
                title: ROOT_HEADING.to_string(),
                level: 0,
                content: Vec::new(),
                parent_index: None,
                children_indices: Vec::new(),
            }],
            source: source.into(),
        }
    }

    /// Id of the root section.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn root(&self) -> SectionId {
        SectionId(0)
    }

    /// Document the tree was built from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of sections, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the tree holds nothing but its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.len() == 1
    }

    /// Creates a section and appends it as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(
        &mut self,
        parent: SectionId,
        level: u32,
        title: impl Into<String>,
    ) -> SectionId {
        let id = SectionId(self.sections.len());
        self.sections.push(Section {
            title: title.into(),
            level,
            content: Vec::new(),
            parent_index: Some(parent),
            children_indices: Vec::new(),
        });
        self.sections[parent.0].children_indices.push(id);
        id
    }

    /// Appends a content item to a section.
    pub fn push_content(&mut self, id: SectionId, item: Content) {
        self.sections[id.0].content.push(item);
    }

    /// Borrow a section.
    #[must_use]
    pub fn get(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }

    /// The `i`-th child of a section, if it has that many.
    #[must_use]
    pub fn child(&self, id: SectionId, i: usize) -> Option<SectionId> {
        self.sections[id.0].children_indices.get(i).copied()
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: SectionId) -> usize {
        self.sections[id.0].children_indices.len()
    }

    /// Level the section was created with.
    #[must_use]
    pub fn level(&self, id: SectionId) -> u32 {
        self.sections[id.0].level
    }

    /// Containing section, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: SectionId) -> Option<SectionId> {
        self.sections[id.0].parent_index
    }

    /// Heading titles from the root down to `id`.
    #[must_use]
    pub fn heading_path(&self, id: SectionId) -> Vec<&str> {
        let mut path = vec![self.sections[id.0].title.as_str()];
        let mut current = self.sections[id.0].parent_index;
        while let Some(parent) = current {
            path.push(self.sections[parent.0].title.as_str());
            current = self.sections[parent.0].parent_index;
        }
        path.reverse();
        path
    }

    /// Section ids in pre-order: each section before its children.
    #[must_use]
    pub fn preorder(&self) -> Vec<SectionId> {
        let mut order = Vec::with_capacity(self.sections.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.sections[id.0].children_indices.iter().rev());
        }
        order
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
