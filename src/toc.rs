//! Table of contents extraction.
//!
//! A document's intended structure comes from its embedded outline when the converter can
//! provide one. Otherwise it is inferred from the rendered headings: first from numeric
//! prefixes such as `2.3 Results`, and when no heading carries one, by clustering the
//! rendered glyph heights of the headings into levels.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

lazy_static! {
    /// Leading section number such as `2`, `2.3` or `2.3.` followed by whitespace.
    static ref NUMERIC_PREFIX: Regex = Regex::new(r"^\d+(\.\d+)*\.?\s").unwrap();
}

#[derive(Clone, Debug, PartialEq)]
/// One line of the table of contents.
pub struct TocEntry {
    /// Hierarchy depth, 1 for top-level entries.
    pub level: u32,
    /// Title as it should appear in the rendered body.
    pub title: String,
    /// Rendered height that produced the level, size heuristic only.
    pub height: Option<f64>,
}

impl TocEntry {
    /// Entry without height information.
    #[must_use]
    pub fn new(level: u32, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            height: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which strategy produced a [`Toc`].
pub enum TocSource {
    /// The document's own outline.
    Outline,
    /// Levels counted from numeric heading prefixes.
    NumericPrefix,
    /// Levels clustered from rendered heading heights.
    Size,
}

#[derive(Clone, Debug, PartialEq)]
/// Ordered, leveled table of contents.
pub struct Toc {
    /// Entries in document order.
    pub entries: Vec<TocEntry>,
    /// Strategy the entries came from.
    pub source: TocSource,
}

impl Toc {
    /// A TOC with no entries; parsing against it yields a root-only tree.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            source: TocSource::Outline,
        }
    }

    /// Whether no entries were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render as the `toc.txt` listing.
    ///
    /// One `level;title` line per entry, or `level;title;;;` when the levels came from the
    /// size heuristic.
    #[must_use]
    pub fn to_listing(&self) -> String {
        let suffix = if self.source == TocSource::Size { ";;;" } else { "" };
        self.entries.iter().fold(String::new(), |mut out, entry| {
            let _ = writeln!(out, "{};{}{suffix}", entry.level, entry.title);
            out
        })
    }

    /// Parse a listing written by [`Toc::to_listing`] (either form).
    ///
    /// Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for a line without a `;` separator, or whose level is not a positive
    /// integer.
    pub fn parse_listing(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut source = TocSource::Outline;
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (level, title) = line.split_once(';').ok_or_else(|| Error::TocListing {
                line: i + 1,
                reason: "missing ';' separator".to_string(),
            })?;
            let level = level.trim().parse::<u32>().map_err(|e| Error::TocListing {
                line: i + 1,
                reason: format!("bad level {level:?}: {e}"),
            })?;
            if level == 0 {
                return Err(Error::TocListing {
                    line: i + 1,
                    reason: "level must be at least 1".to_string(),
                });
            }
            let title = match title.strip_suffix(";;;") {
                Some(stripped) => {
                    source = TocSource::Size;
                    stripped
                }
                None => title,
            };
            entries.push(TocEntry::new(level, title));
        }
        Ok(Self { entries, source })
    }
}

/// Largest rendered height magnitude the size heuristic accepts.
pub const MAX_HEIGHT: f64 = 1e12;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
/// A rendered heading as reported by the converter.
pub struct HeadingDescriptor {
    /// Heading text, possibly spanning several lines.
    pub title: String,
    /// Bounding polygon of the rendered heading, `[x, y]` points clockwise from top-left.
    #[serde(default)]
    pub polygon: Option<Vec<[f64; 2]>>,
    /// Rendered height, when the converter reports it directly.
    #[serde(default)]
    pub height: Option<f64>,
}

impl HeadingDescriptor {
    /// Descriptor carrying only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Descriptor with an explicit rendered height.
    #[must_use]
    pub fn with_height(title: impl Into<String>, height: f64) -> Self {
        Self {
            title: title.into(),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Rendered height rounded to whole units.
    ///
    /// Taken from `height` if set, otherwise from the vertical extent of the polygon
    /// (bottom-right minus top-left). Non-finite heights and heights beyond
    /// [`MAX_HEIGHT`] in magnitude are treated as unmeasurable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded_height(&self) -> Option<i64> {
        let height = self.height.or_else(|| {
            let polygon = self.polygon.as_ref()?;
            Some(polygon.get(2)?[1] - polygon.first()?[1])
        })?;
        (height.abs() <= MAX_HEIGHT).then(|| height.round() as i64)
    }

    fn flat_title(&self) -> String {
        self.title.replace('\n', " ")
    }
}

#[derive(Debug, thiserror::Error)]
/// Why an [`OutlineReader`] could not supply an outline.
pub enum OutlineError {
    /// The document has no embedded outline.
    #[error("document has no outline")]
    NoOutline,
    /// An outline exists but could not be read.
    #[error("malformed outline: {0}")]
    Malformed(String),
    /// The input is not a readable document at all.
    #[error("corrupted document: {0}")]
    Corrupted(String),
}

/// Source of a document's native outline.
pub trait OutlineReader {
    /// Ordered `(level, title)` outline for `document`.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError`] when no usable outline exists.
    fn read_outline(&self, document: &Path) -> std::result::Result<Vec<TocEntry>, OutlineError>;
}

/// Derive the TOC for a document.
///
/// Uses the outline from `reader` when available, falling back to the heading heuristics.
/// A corrupted document yields an empty TOC so the caller still gets a root-only tree.
#[must_use]
pub fn extract_toc(
    document: &Path,
    reader: &dyn OutlineReader,
    headings: &[HeadingDescriptor],
) -> Toc {
    match reader.read_outline(document) {
        Ok(entries) => {
            let entries: Vec<TocEntry> = entries
                .into_iter()
                .map(|entry| TocEntry {
                    title: entry.title.trim_end().to_string(),
                    ..entry
                })
                .collect();
            log::info!("Using embedded outline for {}", document.display());
            if entries.is_empty() {
                log::warn!("Outline of {} has no entries", document.display());
            }
            Toc {
                entries,
                source: TocSource::Outline,
            }
        }
        Err(OutlineError::Corrupted(reason)) => {
            log::error!(
                "Corrupted or non-document input {}: {reason}",
                document.display()
            );
            Toc::empty()
        }
        Err(e @ OutlineError::Malformed(_)) => {
            log::warn!("{}: {e}, falling back to headings", document.display());
            heuristic_toc(document, headings)
        }
        Err(OutlineError::NoOutline) => heuristic_toc(document, headings),
    }
}

fn heuristic_toc(document: &Path, headings: &[HeadingDescriptor]) -> Toc {
    let toc = toc_from_headings(headings);
    if toc.is_empty() {
        log::warn!("No headings detected in {}", document.display());
    } else {
        log::debug!("{}: {:?} TOC from headings", document.display(), toc.source);
    }
    toc
}

/// Heuristic TOC from rendered headings: numeric prefixes if any heading has one, sizes
/// otherwise.
#[must_use]
pub fn toc_from_headings(headings: &[HeadingDescriptor]) -> Toc {
    if has_numeric_prefix(headings) {
        Toc {
            entries: toc_from_numeric_prefix(headings),
            source: TocSource::NumericPrefix,
        }
    } else {
        Toc {
            entries: toc_from_sizes(headings),
            source: TocSource::Size,
        }
    }
}

/// Whether at least one heading starts with a section number.
#[must_use]
pub fn has_numeric_prefix(headings: &[HeadingDescriptor]) -> bool {
    headings.iter().any(|h| NUMERIC_PREFIX.is_match(&h.title))
}

/// Entries for the numbered headings, leveled by their count of numeric segments.
///
/// Headings without a number are left out.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn toc_from_numeric_prefix(headings: &[HeadingDescriptor]) -> Vec<TocEntry> {
    headings
        .iter()
        .filter_map(|heading| {
            let number = NUMERIC_PREFIX.find(&heading.title)?;
            let segments = number
                .as_str()
                .trim()
                .split('.')
                .filter(|s| !s.is_empty())
                .count();
            Some(TocEntry::new(segments as u32, heading.flat_title()))
        })
        .collect()
}

/// Entries leveled by clustering rendered heading heights.
///
/// Heights within one unit of a known height share its level. A heading taller than known
/// structure becomes shallower than it, and everything more than one unit shorter is pushed
/// one level deeper, including headings already emitted.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn toc_from_sizes(headings: &[HeadingDescriptor]) -> Vec<TocEntry> {
    let mut levels: BTreeMap<i64, u32> = BTreeMap::new();
    let mut emitted: Vec<(i64, u32, String)> = Vec::new();

    for heading in headings {
        let Some(size) = heading.rounded_height() else {
            log::warn!("Skipping heading without rendered height: {:?}", heading.title);
            continue;
        };

        let below = size.saturating_sub(1);
        let mut known = None;
        let mut prev_level = 0;
        let mut shallower = false;
        for (&key, &level) in levels.iter().rev() {
            if size == key || below == key {
                known = Some(key);
                break;
            }
            if below > key {
                prev_level = level - 1;
                shallower = true;
                break;
            }
            prev_level = level;
        }

        if shallower {
            for (_, level) in levels.range_mut(..below) {
                *level += 1;
            }
            for (height, level, _) in &mut emitted {
                if *height < below {
                    *level += 1;
                }
            }
        }

        let key = if let Some(key) = known {
            key
        } else {
            levels.insert(size, prev_level + 1);
            size
        };
        emitted.push((key, levels[&key], heading.flat_title()));
    }

    emitted
        .into_iter()
        .map(|(height, level, title)| TocEntry {
            level,
            title,
            height: Some(height as f64),
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/toc.rs"]
mod tests;
