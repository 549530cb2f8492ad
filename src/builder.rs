//! Aligns rendered headings with the TOC and builds the section tree in one forward pass.
//!
//! Converter output is noisy: headings wrap, lose punctuation, or appear in front matter that
//! is not part of the structure at all. A heading line only opens a new section when it is
//! similar enough to the next unconsumed TOC entry; everything else is body content. Text and
//! tables seen since the last accepted boundary are held back and flushed onto the current
//! section when the next boundary is accepted or the input ends.

use crate::section::{Content, SectionId, SectionTree};
use crate::similarity;
use crate::toc::{Toc, TocEntry};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::str::Lines;

/// Default similarity a heading must exceed to match its TOC entry.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Word identifying a TOC entry that points at the table of contents itself.
///
/// Always compared at [`DEFAULT_THRESHOLD`], whatever threshold headings are matched with.
const CONTENTS_MARKER: &str = "contents";

lazy_static! {
    static ref INLINE_SPAN: Regex = Regex::new(r"<span[^>]*?/?>(</span>)?").unwrap();
    static ref HEADING_MARKER: Regex = Regex::new(r"^#+").unwrap();
    static ref CAPTION: Regex = Regex::new(r"(?i)^(Table|Figure)\s+\d+").unwrap();
}

/// Removes the `<span ...>` anchors converters scatter through rendered lines.
#[must_use]
pub fn strip_inline_markup(line: &str) -> String {
    INLINE_SPAN.replace_all(line, "").into_owned()
}

/// Whether a line reads like a "Table N" / "Figure N" caption.
#[must_use]
pub fn is_caption(line: &str) -> bool {
    CAPTION.is_match(line.trim_start())
}

/// Line reader with an explicit lookahead buffer.
///
/// Lines can be inspected any distance ahead without being consumed, which is what table
/// boundary and caption detection need.
struct LineCursor<'a> {
    lines: Lines<'a>,
    lookahead: VecDeque<&'a str>,
}

impl<'a> LineCursor<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            lines: body.lines(),
            lookahead: VecDeque::new(),
        }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        self.lookahead.pop_front().or_else(|| self.lines.next())
    }

    fn peek_nth(&mut self, n: usize) -> Option<&'a str> {
        while self.lookahead.len() <= n {
            self.lookahead.push_back(self.lines.next()?);
        }
        self.lookahead.get(n).copied()
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.peek_nth(0)
    }

    /// First line after the cursor that is not blank once markup is stripped.
    fn peek_non_blank(&mut self) -> Option<String> {
        (0..)
            .map_while(|n| self.peek_nth(n))
            .map(strip_inline_markup)
            .find(|line| !line.trim().is_empty())
    }
}

/// State of one parse: lives for a single [`TreeBuilder::build`] call.
struct Pass {
    tree: SectionTree,
    current: SectionId,
    /// Most recent section created at each level.
    routes: BTreeMap<u32, SectionId>,
    /// Index of the next unconsumed TOC entry.
    cursor: usize,
    text: String,
    tables: Vec<Content>,
    previous: String,
}

impl Pass {
    fn new(source: PathBuf) -> Self {
        let tree = SectionTree::new(source);
        let root = tree.root();
        Self {
            tree,
            current: root,
            routes: BTreeMap::from([(0, root)]),
            cursor: 0,
            text: String::new(),
            tables: Vec::new(),
            previous: String::new(),
        }
    }

    fn push_text(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Attaches buffered text, then queued tables, to the current section.
    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.tree.push_content(self.current, Content::Text(text));
        }
        for table in self.tables.drain(..) {
            self.tree.push_content(self.current, table);
        }
    }

    /// Opens a section for a matched TOC entry and makes it current.
    fn open_section(&mut self, entry: &TocEntry, title: String) {
        self.flush();
        let parent = if entry.level > self.tree.level(self.current) {
            self.current
        } else {
            self.routes
                .range(..entry.level)
                .next_back()
                .map_or(self.tree.root(), |(_, &id)| id)
        };
        let id = self.tree.add_child(parent, entry.level, title);
        self.routes.insert(entry.level, id);
        self.cursor += 1;
        self.current = id;
    }
}

/// Builds a [`SectionTree`] from rendered body text and a TOC.
pub struct TreeBuilder<'t> {
    toc: &'t [TocEntry],
    threshold: f64,
}

impl<'t> TreeBuilder<'t> {
    /// Builder matching against `toc` with the default threshold.
    #[must_use]
    pub fn new(toc: &'t Toc) -> Self {
        Self {
            toc: &toc.entries,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Overrides the similarity a heading must exceed to be accepted.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Walks `body` once and returns the populated tree for `source`.
    ///
    /// TOC entries still unconsumed at the end are logged; the tree is returned regardless.
    #[must_use]
    pub fn build(&self, source: impl Into<PathBuf>, body: &str) -> SectionTree {
        let mut pass = Pass::new(source.into());
        let mut lines = LineCursor::new(body);

        while let Some(raw) = lines.next_line() {
            let line = strip_inline_markup(raw);
            if line.trim().is_empty() {
                continue;
            }
            if HEADING_MARKER.is_match(&line) {
                self.heading_line(&mut pass, &line);
            } else if line.starts_with('|') {
                let (table, last_row) = Self::table_block(&mut lines, &line, &pass.previous);
                pass.tables.push(table);
                pass.previous = last_row;
                continue;
            } else if !is_caption(&line) {
                pass.push_text(&line);
            }
            pass.previous = line;
        }
        pass.flush();

        let remaining = self.toc.len() - pass.cursor;
        if remaining > 0 {
            log::warn!(
                "{remaining} TOC entries never matched in {}, document may not have been parsed accurately",
                pass.tree.source().display()
            );
        }
        log::debug!("Built {} sections", pass.tree.len());
        pass.tree
    }

    fn heading_line(&self, pass: &mut Pass, line: &str) {
        let title = line.trim_start_matches('#').trim().replace('*', "");

        while self
            .toc
            .get(pass.cursor)
            .is_some_and(|entry| {
                similarity::ratio(CONTENTS_MARKER, &entry.title) > DEFAULT_THRESHOLD
            })
        {
            log::debug!("Skipping contents entry {:?}", self.toc[pass.cursor].title);
            pass.cursor += 1;
        }

        match self.toc.get(pass.cursor) {
            Some(entry) if similarity::ratio(&title, &entry.title) > self.threshold => {
                pass.open_section(entry, title);
            }
            Some(entry) => {
                log::debug!("Heading {title:?} does not match TOC entry {:?}", entry.title);
                pass.push_text(line);
            }
            None => pass.push_text(line),
        }
    }

    /// Consumes the rows following `first` and captions the block.
    ///
    /// Returns the table and its last row, which becomes the previous line.
    fn table_block(lines: &mut LineCursor<'_>, first: &str, previous: &str) -> (Content, String) {
        let mut markdown = String::new();
        let mut last = first.to_string();
        markdown.push_str(first);
        markdown.push('\n');
        while lines
            .peek()
            .is_some_and(|next| strip_inline_markup(next).starts_with('|'))
        {
            if let Some(row) = lines.next_line() {
                last = strip_inline_markup(row);
                markdown.push_str(&last);
                markdown.push('\n');
            }
        }

        let caption = if is_caption(previous) {
            previous.trim().to_string()
        } else {
            lines
                .peek_non_blank()
                .filter(|next| is_caption(next))
                .map(|next| next.trim().to_string())
                .unwrap_or_default()
        };
        (Content::Table { markdown, caption }, last)
    }
}

#[cfg(test)]
#[path = "tests/builder.rs"]
mod tests;
