use super::{flat_view, write_artifacts, NestedView, FLAT_FILE, TOC_FILE, TREE_FILE};
use crate::builder::TreeBuilder;
use crate::section::{SectionId, SectionTree};
use crate::toc::{Toc, TocEntry, TocSource};
use serde_json::{json, Value};
use std::fs;

fn sample_toc() -> Toc {
    Toc {
        entries: vec![
            TocEntry::new(1, "Intro"),
            TocEntry::new(2, "Scope"),
            TocEntry::new(1, "Methods"),
        ],
        source: TocSource::Outline,
    }
}

fn sample_tree(toc: &Toc) -> SectionTree {
    TreeBuilder::new(toc).build(
        "/data/report.md",
        "lead\n# Intro\ntext\n## Scope\nTable 1: Limits\n| a |\n# Methods\nmore text\n",
    )
}

/// Pre-order (heading, content) pairs read back out of the JSON.
fn walk_json(value: &Value, out: &mut Vec<(String, Vec<String>)>) {
    let (heading, body) = value.as_object().unwrap().iter().next().unwrap();
    let content = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item.as_str().unwrap().to_string())
        .collect();
    out.push((heading.clone(), content));
    for child in body["children"].as_array().unwrap() {
        walk_json(child, out);
    }
}

fn walk_tree(tree: &SectionTree, id: SectionId, out: &mut Vec<(String, Vec<String>)>) {
    let section = tree.get(id);
    out.push((
        section.title.clone(),
        section.content.iter().map(crate::section::Content::render).collect(),
    ));
    for i in 0..tree.child_count(id) {
        walk_tree(tree, tree.child(id, i).unwrap(), out);
    }
}

#[test]
fn test_flat_view() {
    let toc = sample_toc();
    let tree = sample_tree(&toc);

    assert_eq!(
        flat_view(&tree),
        "[root]\nlead\n[root > Intro]\ntext\n[root > Intro > Scope]\nTable 1: Limits\n| a |\n[root > Methods]\nmore text\n"
    );
}

#[test]
fn test_nested_view_shape() {
    let toc = sample_toc();
    let tree = sample_tree(&toc);
    let value = serde_json::to_value(NestedView::from_tree(&tree)).unwrap();

    assert_eq!(
        value,
        json!({
            "root": {
                "content": ["lead\n"],
                "children": [
                    {"Intro": {
                        "content": ["text\n"],
                        "children": [
                            {"Scope": {"content": ["Table 1: Limits\n| a |\n"], "children": []}}
                        ]
                    }},
                    {"Methods": {"content": ["more text\n"], "children": []}}
                ]
            }
        })
    );
}

#[test]
fn test_nested_view_walk_matches_tree() {
    let toc = sample_toc();
    let tree = sample_tree(&toc);
    let json = NestedView::from_tree(&tree).to_json().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    let mut from_json = Vec::new();
    walk_json(&value, &mut from_json);
    let mut from_tree = Vec::new();
    walk_tree(&tree, tree.root(), &mut from_tree);

    assert_eq!(from_json, from_tree);
}

#[test]
fn test_write_artifacts_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let toc = sample_toc();
    let tree = sample_tree(&toc);

    let first = write_artifacts(dir.path(), &toc, &tree).unwrap();
    let second = write_artifacts(dir.path(), &toc, &tree).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, dir.path().join("report"));
    assert_eq!(
        fs::read_to_string(first.join(TOC_FILE)).unwrap(),
        "1;Intro\n2;Scope\n1;Methods\n"
    );
    assert_eq!(
        fs::read_to_string(first.join(FLAT_FILE)).unwrap(),
        flat_view(&tree)
    );
    let value: Value =
        serde_json::from_str(&fs::read_to_string(first.join(TREE_FILE)).unwrap()).unwrap();
    assert!(value.get("root").is_some());
}
