use super::*;
use crate::memory::{ElementSpec, MemoryDocument};

fn page(children: Vec<ElementSpec>) -> MemoryDocument {
    let mut doc = MemoryDocument::new("https://example.test/page", "Page");
    let body = doc.body();
    for child in children {
        doc.append(body, child);
    }
    doc
}

fn login_form() -> ElementSpec {
    ElementSpec::new("form").id("login").children([
        ElementSpec::new("h2").text("Sign in"),
        ElementSpec::new("div").child(
            ElementSpec::new("input")
                .attr("type", "text")
                .attr("name", "user")
                .attr("placeholder", "Username"),
        ),
        ElementSpec::new("button").attr("type", "submit").text("Go"),
    ])
}

#[test]
fn test_interactive_only_splices_wrappers() {
    let doc = page(vec![login_form()]);
    let mut builder = SnapshotBuilder::new();
    let snap = builder.build(&doc, &SnapshotOptions::default()).unwrap();

    assert_eq!(snap.tree.tag, "body");
    assert_eq!(snap.tree.role, Role::Document);
    let roles: Vec<Role> = snap.tree.children.iter().map(|c| c.role).collect();
    assert_eq!(roles, vec![Role::Heading, Role::Textbox, Role::Button]);
    assert_eq!(snap.refs.len(), 3);
    assert_eq!(snap.tree.refs(), snap.refs.keys().copied().collect::<Vec<_>>());

    let textbox = &snap.tree.children[1];
    assert_eq!(textbox.name.as_deref(), Some("Username"));
    assert_eq!(textbox.attrs.get("name").map(String::as_str), Some("user"));
    assert!(textbox.text.is_none());
}

#[test]
fn test_full_mode_keeps_landmarks_without_refs() {
    let doc = page(vec![login_form(), ElementSpec::new("p")]);
    let mut builder = SnapshotBuilder::new();
    let options = SnapshotOptions::default().with_interactive_only(false);
    let snap = builder.build(&doc, &options).unwrap();

    let form = &snap.tree.children[0];
    assert_eq!(form.role, Role::Form);
    assert!(form.node_ref.is_none());
    assert_eq!(form.children.len(), 3);
    assert_eq!(form.children[0].text.as_deref(), Some("Sign in"));

    // Empty paragraph is still content-bearing and gets a ref.
    let para = &snap.tree.children[1];
    assert_eq!(para.role, Role::Paragraph);
    assert!(para.node_ref.is_some());
    assert_eq!(snap.refs.len(), 4);
}

#[test]
fn test_interactive_only_drops_unnamed_content() {
    let doc = page(vec![
        ElementSpec::new("main").child(ElementSpec::new("p").text("Hello")),
        ElementSpec::new("p"),
        ElementSpec::new("img"),
    ]);
    let snap = SnapshotBuilder::new().build(&doc, &SnapshotOptions::default()).unwrap();
    assert_eq!(snap.tree.children.len(), 1);
    assert_eq!(snap.tree.children[0].role, Role::Paragraph);
    assert_eq!(snap.tree.children[0].name.as_deref(), Some("Hello"));
    assert_eq!(snap.stats.emitted, 1);
}

#[test]
fn test_refs_follow_preorder() {
    let doc = page(vec![ElementSpec::new("ul").children([
        ElementSpec::new("li").child(ElementSpec::new("a").attr("href", "/1").text("One")),
        ElementSpec::new("li").child(ElementSpec::new("a").attr("href", "/2").text("Two")),
    ])]);
    let snap = SnapshotBuilder::new()
        .build(&doc, &SnapshotOptions::default().with_interactive_only(false))
        .unwrap();
    let names: Vec<String> = snap
        .refs
        .values()
        .map(|e| format!("{}:{}", e.node_ref, e.role))
        .collect();
    assert_eq!(
        names,
        vec!["e1:list", "e2:listitem", "e3:link", "e4:listitem", "e5:link"]
    );
}

#[test]
fn test_hidden_subtrees_counted_once() {
    let doc = page(vec![
        ElementSpec::new("div")
            .style("display", "none")
            .child(ElementSpec::new("button").text("A"))
            .child(ElementSpec::new("button").text("B")),
        ElementSpec::new("button").attr("aria-hidden", "true").text("C"),
        ElementSpec::new("button").text("D"),
    ]);
    let snap = SnapshotBuilder::new().build(&doc, &SnapshotOptions::default()).unwrap();
    assert_eq!(snap.stats.skipped_hidden, 2);
    assert_eq!(snap.refs.len(), 1);
    assert_eq!(snap.stats.dom_nodes, 6);
    assert_eq!(snap.stats.visited, 2);
}

#[test]
fn test_max_nodes_budget_returns_partial_tree() {
    let buttons = (0..20).map(|i| ElementSpec::new("button").text(format!("B{}", i)));
    let doc = page(buttons.collect());
    let snap = SnapshotBuilder::new()
        .build(&doc, &SnapshotOptions::default().with_max_nodes(5))
        .unwrap();
    assert!(snap.stats.truncated());
    assert!(snap.stats.truncate_reasons.contains(TruncateReason::MaxNodes));
    assert_eq!(snap.stats.visited, 5);
    assert_eq!(snap.stats.emitted, 5 - 1);
    assert_eq!(snap.refs.len(), 4);
}

#[test]
fn test_zero_options_fall_back_to_defaults() {
    let options = SnapshotOptions {
        max_nodes: 0,
        max_text_per_node: 0,
        max_attr_value_len: 0,
        scope: Some("   ".to_string()),
        ..Default::default()
    };
    let sanitized = options.sanitized();
    assert_eq!(sanitized.max_nodes, 500);
    assert_eq!(sanitized.max_text_per_node, 200);
    assert_eq!(sanitized.max_attr_value_len, 150);
    assert!(sanitized.scope.is_none());
}

#[test]
fn test_scope_selects_root() {
    let doc = page(vec![
        ElementSpec::new("nav").child(ElementSpec::new("a").attr("href", "/").text("Home")),
        login_form(),
    ]);
    let snap = SnapshotBuilder::new()
        .build(&doc, &SnapshotOptions::default().with_scope("#login"))
        .unwrap();
    assert_eq!(snap.tree.tag, "form");
    assert_eq!(snap.tree.role, Role::Form);
    assert!(snap.tree.node_ref.is_none());
    assert!(snap.find_by_name("Home").is_empty());
    assert_eq!(snap.find_by_name("Go").len(), 1);
}

#[test]
fn test_scope_errors_are_no_root() {
    let doc = page(vec![login_form()]);
    let mut builder = SnapshotBuilder::new();
    let missing = builder
        .build(&doc, &SnapshotOptions::default().with_scope("#nope"))
        .unwrap_err();
    assert_eq!(missing.code, ErrorCode::NoRoot);
    let invalid = builder
        .build(&doc, &SnapshotOptions::default().with_scope("a > b"))
        .unwrap_err();
    assert_eq!(invalid.code, ErrorCode::NoRoot);
}

#[test]
fn test_attr_values_clamped() {
    let long = "x".repeat(300);
    let doc = page(vec![ElementSpec::new("a").attr("href", long).attr("data-x", "y").text("L")]);
    let options = SnapshotOptions {
        max_attr_value_len: 10,
        ..Default::default()
    };
    let snap = SnapshotBuilder::new().build(&doc, &options).unwrap();
    let entry = snap.refs.values().next().unwrap();
    assert_eq!(entry.attrs.get("href").map(|v| v.chars().count()), Some(10));
    assert!(!entry.attrs.contains_key("data-x"));
}

#[test]
fn test_rebuild_invalidates_old_refs() {
    let doc = page(vec![ElementSpec::new("button").text("Go")]);
    let mut builder = SnapshotBuilder::new();
    let first = builder.build(&doc, &SnapshotOptions::default()).unwrap();
    let old = *first.refs.keys().next().unwrap();
    let second = builder.build(&doc, &SnapshotOptions::default()).unwrap();
    let new = *second.refs.keys().next().unwrap();
    assert_ne!(old, new);
    assert_eq!(builder.resolve(old, &doc).unwrap_err().code, ErrorCode::RefNotFound);
    assert!(builder.resolve(new, &doc).is_ok());
}

#[test]
fn test_hidden_scope_root_is_empty() {
    let doc = page(vec![ElementSpec::new("section")
        .id("s")
        .attr("hidden", "")
        .child(ElementSpec::new("button").text("X"))]);
    let snap = SnapshotBuilder::new()
        .build(&doc, &SnapshotOptions::default().with_scope("#s"))
        .unwrap();
    assert!(snap.tree.children.is_empty());
    assert_eq!(snap.stats.skipped_hidden, 1);
    assert!(snap.refs.is_empty());
}

#[test]
fn test_snapshot_serializes_with_ref_keys() {
    let doc = page(vec![ElementSpec::new("button").text("Go")]);
    let snap = SnapshotBuilder::new().build(&doc, &SnapshotOptions::default()).unwrap();
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["refs"]["e1"]["role"], "button");
    assert_eq!(json["refs"]["e1"]["ref"], "e1");
    assert_eq!(json["tree"]["children"][0]["ref"], "e1");
    let back: Snapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back.refs.len(), 1);
}
