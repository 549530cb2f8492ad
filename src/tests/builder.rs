use super::{is_caption, strip_inline_markup, TreeBuilder};
use crate::section::{Content, SectionTree};
use crate::toc::{Toc, TocEntry, TocSource};

fn toc(entries: &[(u32, &str)]) -> Toc {
    Toc {
        entries: entries
            .iter()
            .map(|&(level, title)| TocEntry::new(level, title))
            .collect(),
        source: TocSource::Outline,
    }
}

fn build(entries: &[(u32, &str)], body: &str) -> SectionTree {
    let toc = toc(entries);
    TreeBuilder::new(&toc).build("doc.md", body)
}

fn titles(tree: &SectionTree, id: crate::section::SectionId) -> Vec<String> {
    tree.get(id)
        .children_indices
        .iter()
        .map(|&child| tree.get(child).title.clone())
        .collect()
}

fn text(s: &str) -> Content {
    Content::Text(s.to_string())
}

#[test]
fn test_two_top_level_sections() {
    let tree = build(
        &[(1, "Intro"), (1, "Methods")],
        "# Intro\ntext\n# Methods\nmore text",
    );
    let root = tree.root();

    assert_eq!(titles(&tree, root), vec!["Intro", "Methods"]);
    let intro = tree.child(root, 0).unwrap();
    let methods = tree.child(root, 1).unwrap();
    assert_eq!(tree.get(intro).content, vec![text("text\n")]);
    assert_eq!(tree.get(methods).content, vec![text("more text\n")]);
    assert!(tree.get(root).content.is_empty());
}

#[test]
fn test_node_count_counts_matched_entries_only() {
    let tree = build(
        &[(1, "Intro"), (1, "Methods"), (1, "Never Rendered")],
        "# Preface\nfront\n# Intro\na\n# Methods\nb\n",
    );

    assert_eq!(tree.len(), 3);
    assert_eq!(
        tree.get(tree.root()).content,
        vec![text("# Preface\nfront\n")]
    );
}

#[test]
fn test_levels_route_to_ancestors() {
    let tree = build(
        &[
            (1, "1 Intro"),
            (2, "1.1 Scope"),
            (2, "1.2 Terms"),
            (1, "2 Methods"),
            (3, "2.1.1 Deep"),
            (2, "2.2 Data"),
        ],
        "# 1 Intro\n## 1.1 Scope\n## 1.2 Terms\n# 2 Methods\n### 2.1.1 Deep\n## 2.2 Data\n",
    );
    let root = tree.root();
    assert_eq!(titles(&tree, root), vec!["1 Intro", "2 Methods"]);

    let intro = tree.child(root, 0).unwrap();
    let methods = tree.child(root, 1).unwrap();
    assert_eq!(titles(&tree, intro), vec!["1.1 Scope", "1.2 Terms"]);
    assert_eq!(titles(&tree, methods), vec!["2.1.1 Deep", "2.2 Data"]);

    let deep = tree.child(methods, 0).unwrap();
    assert_eq!(tree.level(deep), 3);
    assert_eq!(tree.parent(deep), Some(methods));
}

#[test]
fn test_fuzzy_heading_match() {
    let tree = build(
        &[(1, "1 Introduction ")],
        "# **1. Introduction**\nbody\n",
    );
    let intro = tree.child(tree.root(), 0).unwrap();
    assert_eq!(tree.get(intro).title, "1. Introduction");
}

#[test]
fn test_threshold_override() {
    let toc = toc(&[(1, "1 Introduction")]);
    let tree = TreeBuilder::new(&toc)
        .with_threshold(0.99)
        .build("doc.md", "# 1. Introduction\nbody\n");
    assert!(tree.is_empty());
}

#[test]
fn test_contents_entry_is_skipped() {
    let tree = build(
        &[(1, "Contents"), (1, "Intro")],
        "# Table of Contents\nfoo\n# Intro\nbar\n",
    );

    assert_eq!(tree.len(), 2);
    assert_eq!(titles(&tree, tree.root()), vec!["Intro"]);
    assert_eq!(
        tree.get(tree.root()).content,
        vec![text("# Table of Contents\nfoo\n")]
    );
}

#[test]
fn test_contents_marker_ignores_threshold_override() {
    let strict = toc(&[(1, "Table of Contents"), (1, "Intro")]);
    let tree = TreeBuilder::new(&strict)
        .with_threshold(0.9)
        .build("doc.md", "# Contents\nfoo\n# Intro\nbar\n");

    assert_eq!(tree.len(), 2);
    assert_eq!(titles(&tree, tree.root()), vec!["Intro"]);
    assert_eq!(
        tree.get(tree.root()).content,
        vec![text("# Contents\nfoo\n")]
    );

    let lenient = toc(&[(1, "Intro")]);
    let tree = TreeBuilder::new(&lenient)
        .with_threshold(0.3)
        .build("doc.md", "# Intro\nbar\n");
    assert_eq!(titles(&tree, tree.root()), vec!["Intro"]);
}

#[test]
fn test_exhausted_toc_keeps_headings_as_text() {
    let tree = build(&[(1, "Intro")], "# Intro\na\n# Extra\nb");
    let intro = tree.child(tree.root(), 0).unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(intro).content, vec![text("a\n# Extra\nb\n")]);
}

#[test]
fn test_table_caption_from_preceding_line() {
    let tree = build(
        &[(1, "Results")],
        "# Results\nTable 3: Results\n| a | b |\n|---|---|\n| 1 | 2 |\n\nunrelated text\n",
    );
    let results = tree.child(tree.root(), 0).unwrap();

    assert_eq!(
        tree.get(results).content,
        vec![
            text("unrelated text\n"),
            Content::Table {
                markdown: "| a | b |\n|---|---|\n| 1 | 2 |\n".to_string(),
                caption: "Table 3: Results".to_string(),
            },
        ]
    );
}

#[test]
fn test_table_without_caption() {
    let tree = build(&[], "intro text\n| x |\n| y |\nafter\n");

    assert_eq!(
        tree.get(tree.root()).content,
        vec![
            text("intro text\nafter\n"),
            Content::Table {
                markdown: "| x |\n| y |\n".to_string(),
                caption: String::new(),
            },
        ]
    );
}

#[test]
fn test_table_caption_from_following_line() {
    let tree = build(&[], "| x |\n\nFigure 2 Layout\n");

    assert_eq!(
        tree.get(tree.root()).content,
        vec![Content::Table {
            markdown: "| x |\n".to_string(),
            caption: "Figure 2 Layout".to_string(),
        }]
    );
}

#[test]
fn test_preceding_caption_wins() {
    let tree = build(&[], "Table 1 before\n| x |\nTable 2 after\n");

    assert_eq!(
        tree.get(tree.root()).content,
        vec![Content::Table {
            markdown: "| x |\n".to_string(),
            caption: "Table 1 before".to_string(),
        }]
    );
}

#[test]
fn test_tables_flush_with_their_section() {
    let tree = build(
        &[(1, "Intro"), (1, "Methods")],
        "# Intro\n| x |\n# Methods\nm\n",
    );
    let intro = tree.child(tree.root(), 0).unwrap();
    let methods = tree.child(tree.root(), 1).unwrap();

    assert_eq!(
        tree.get(intro).content,
        vec![Content::Table {
            markdown: "| x |\n".to_string(),
            caption: String::new(),
        }]
    );
    assert_eq!(tree.get(methods).content, vec![text("m\n")]);
}

#[test]
fn test_spans_and_blank_lines() {
    let tree = build(
        &[(1, "Intro")],
        "# <span id=\"page-2-0\"></span>Intro\n\na <span id=\"x\"/>b\n\n\nc\n",
    );
    let intro = tree.child(tree.root(), 0).unwrap();

    assert_eq!(tree.get(intro).title, "Intro");
    assert_eq!(tree.get(intro).content, vec![text("a b\nc\n")]);
}

#[test]
fn test_table_rows_with_leading_spans_continue_the_block() {
    let tree = build(&[], "| a |\n<span id=\"x\"></span>| b |\nafter\n");

    assert_eq!(
        tree.get(tree.root()).content,
        vec![
            text("after\n"),
            Content::Table {
                markdown: "| a |\n| b |\n".to_string(),
                caption: String::new(),
            },
        ]
    );
}

#[test]
fn test_helpers() {
    assert_eq!(
        strip_inline_markup("<span id=\"page-1-0\"></span>Title"),
        "Title"
    );
    assert!(is_caption("TABLE 12: Totals"));
    assert!(is_caption("Figure 3"));
    assert!(!is_caption("Tables are fun"));
    assert!(!is_caption("See Table 3"));
}
