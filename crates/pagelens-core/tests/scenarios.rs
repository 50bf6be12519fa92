//! End-to-end scenarios through the public `PageAgent` surface.

use pagelens_core::{
    ActionKind, ActionPayload, ElementSpec, ErrorCode, EventKind, HostDocument, MemoryDocument,
    PageAgent, QueryKind, QueryPayload, Ref, RenderOptions, SnapshotEnvelope, SnapshotOptions,
    TruncateReason,
};

fn login_page() -> MemoryDocument {
    let mut doc = MemoryDocument::new("https://example.test/login", "Login");
    let body = doc.body();
    let form = doc.append(body, ElementSpec::new("form").rect(0.0, 0.0, 400.0, 200.0));
    doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "text")
            .attr("placeholder", "Username")
            .rect(10.0, 10.0, 200.0, 30.0),
    );
    doc.append(
        form,
        ElementSpec::new("button")
            .attr("type", "submit")
            .text("Sign in")
            .rect(10.0, 60.0, 100.0, 30.0),
    );
    doc
}

fn ref_named(env: &SnapshotEnvelope, name: &str) -> Ref {
    env.body
        .refs
        .values()
        .find(|e| e.name.as_deref() == Some(name))
        .map(|e| e.node_ref)
        .unwrap_or_else(|| panic!("no ref named {:?}", name))
}

#[test]
fn test_form_fill_blocked_click_and_retry() {
    let mut agent = PageAgent::new(login_page());
    let snap = agent.snapshot(&SnapshotOptions::default());
    assert!(snap.ok);
    assert_eq!(snap.body.refs.len(), 2);
    let user = ref_named(&snap, "Username");
    let submit = ref_named(&snap, "Sign in");

    let filled = agent.act(user, ActionKind::Fill, &ActionPayload::value("hello"));
    assert!(filled.ok);
    let value = agent.query(user, QueryKind::Value, &QueryPayload::default());
    assert_eq!(value.body.value.as_deref(), Some("hello"));

    // A consent banner appears over the page.
    let body = agent.document().body();
    let banner = agent.document_mut().append(
        body,
        ElementSpec::new("div")
            .id("consent")
            .style("position", "fixed")
            .style("z-index", "999")
            .rect(0.0, 0.0, 1280.0, 720.0)
            .text("We use cookies"),
    );
    let blocked = agent.act(submit, ActionKind::Click, &ActionPayload::default());
    assert!(!blocked.ok);
    assert_eq!(blocked.error_code(), Some(ErrorCode::ElementBlocked));
    let message = &blocked.error.as_ref().unwrap().message;
    assert!(message.contains("div#consent"));
    assert!(message.contains("consent banner"));
    let submit_node = agent.document().query_selector("button").unwrap().unwrap();
    assert!(agent.document().events_for(submit_node).is_empty());

    agent.document_mut().remove(banner);
    let clicked = agent.act(submit, ActionKind::Click, &ActionPayload::default());
    assert!(clicked.ok, "{:?}", clicked.error);
    assert!(agent.document().events_for(submit_node).contains(&EventKind::Click));
}

#[test]
fn test_six_cards_click_only_the_third() {
    let mut doc = MemoryDocument::new("https://example.test/cards", "Cards");
    let body = doc.body();
    let mut cards = Vec::new();
    for i in 1..=6 {
        let card = doc.append(
            body,
            ElementSpec::new("button")
                .attr("class", "card")
                .text(format!("Card {}", i))
                .rect(0.0, (i as f64) * 50.0, 200.0, 40.0),
        );
        doc.on(card, EventKind::Click, move |doc, target| {
            doc.set_attribute(target, "data-clicked", "true");
            let label = doc.text_content(target);
            doc.set_text(target, format!("{} picked", label));
        });
        cards.push(card);
    }

    let mut agent = PageAgent::new(doc);
    let snap = agent.snapshot(&SnapshotOptions::default());
    let refs: Vec<Ref> = snap.body.refs.keys().copied().collect();
    assert_eq!(refs.len(), 6);

    let env = agent.act(refs[2], ActionKind::Click, &ActionPayload::default());
    assert!(env.ok, "{:?}", env.error);
    for (i, card) in cards.iter().enumerate() {
        let clicked = agent.document().attribute(*card, "data-clicked").is_some();
        assert_eq!(clicked, i == 2, "card {}", i + 1);
    }

    // The page's own marker shows up on the third card only.
    let after = agent.snapshot(&SnapshotOptions::default());
    let names: Vec<String> = after
        .body
        .refs
        .values()
        .filter_map(|e| e.name.clone())
        .collect();
    assert_eq!(names.len(), 6);
    let picked: Vec<&String> = names.iter().filter(|n| n.ends_with("picked")).collect();
    assert_eq!(picked, ["Card 3 picked"]);
    let rendered = agent
        .render(&SnapshotOptions::default(), &RenderOptions::default())
        .1
        .unwrap();
    assert_eq!(rendered.text.matches("picked").count(), 1);
    assert!(rendered.text.contains("button \"Card 3 picked\""));
}

#[test]
fn test_max_nodes_budget() {
    let mut doc = MemoryDocument::new("https://example.test/many", "Many");
    let body = doc.body();
    for i in 0..50 {
        doc.append(body, ElementSpec::new("button").text(format!("B{}", i)));
    }
    let mut agent = PageAgent::new(doc);
    let snap = agent.snapshot(&SnapshotOptions::default().with_max_nodes(5));
    assert!(snap.ok);
    let stats = snap.body.stats.as_ref().unwrap();
    assert!(stats.truncated());
    assert!(stats.truncate_reasons.contains(TruncateReason::MaxNodes));
    assert!(stats.visited <= 5);
    assert!(snap.body.refs.len() <= 5);
    assert_eq!(stats.dom_nodes, 51);

    let json = snap.to_value();
    assert_eq!(json["stats"]["truncated"], true);
    assert_eq!(json["stats"]["truncateReasons"][0], "maxNodes");
}

#[test]
fn test_refs_are_stale_after_rebuild_and_navigation() {
    let mut agent = PageAgent::new(login_page());
    let first = agent.snapshot(&SnapshotOptions::default());
    let old = ref_named(&first, "Sign in");

    let second = agent.snapshot(&SnapshotOptions::default());
    let fresh = ref_named(&second, "Sign in");
    assert_ne!(old, fresh);
    let env = agent.query(old, QueryKind::Text, &QueryPayload::default());
    assert_eq!(env.error_code(), Some(ErrorCode::RefNotFound));
    let env = agent.query(fresh, QueryKind::Text, &QueryPayload::default());
    assert_eq!(env.body.value.as_deref(), Some("Sign in"));

    agent.document_mut().navigate(
        "https://example.test/next",
        "Next",
        ElementSpec::new("body").child(ElementSpec::new("button").text("Sign in")),
    );
    let env = agent.act(fresh, ActionKind::Click, &ActionPayload::default());
    assert_eq!(env.error_code(), Some(ErrorCode::RefNotFound));
    assert_eq!(
        env.error.as_ref().unwrap().message,
        format!("ref {} not found", fresh)
    );
}

#[test]
fn test_compact_and_full_rendering() {
    let mut doc = MemoryDocument::new("https://example.test/layout", "Layout");
    let body = doc.body();
    let nav = doc.append(body, ElementSpec::new("nav"));
    doc.append(nav, ElementSpec::new("a").attr("href", "/home").text("Home"));
    doc.append(body, ElementSpec::new("section").attr("aria-label", "Empty"));
    let main = doc.append(body, ElementSpec::new("main"));
    doc.append(main, ElementSpec::new("nav"));

    let mut agent = PageAgent::new(doc);
    let options = SnapshotOptions::default().with_interactive_only(false);
    let (_, compact) = agent.render(&options, &RenderOptions::default());
    let (_, full) = agent.render(&options, &RenderOptions::default().with_compact(false));
    let compact = compact.unwrap();
    let full = full.unwrap();

    assert!(compact.text.contains("- navigation:"));
    assert!(compact.text.contains("link \"Home\""));
    assert!(!compact.text.contains("- main:"));
    assert!(full.text.contains("- main:"));
    assert!(full.nodes_rendered > compact.nodes_rendered);
}

#[test]
fn test_rebuild_is_deterministic() {
    let options = SnapshotOptions::default().with_interactive_only(false);
    let mut a = PageAgent::new(login_page());
    let mut b = PageAgent::new(login_page());
    let (sa, ra) = a.render(&options, &RenderOptions::default());
    let (sb, rb) = b.render(&options, &RenderOptions::default());
    assert_eq!(sa.body.tree, sb.body.tree);
    assert_eq!(sa.body.refs, sb.body.refs);
    assert_eq!(ra.unwrap().text, rb.unwrap().text);

    // Rebuilding the same document yields the same shape with fresh refs.
    let (again, _) = a.render(&options, &RenderOptions::default());
    let first: Vec<_> = sa.body.refs.values().map(|e| (e.role, e.name.clone())).collect();
    let second: Vec<_> = again.body.refs.values().map(|e| (e.role, e.name.clone())).collect();
    assert_eq!(first, second);
    assert!(again.body.refs.keys().all(|r| !sa.body.refs.contains_key(r)));
}

#[test]
fn test_render_stays_within_budget() {
    let mut doc = MemoryDocument::new("https://example.test/long", "Long");
    let body = doc.body();
    for i in 0..200 {
        doc.append(
            body,
            ElementSpec::new("a")
                .attr("href", format!("/item/{}", i))
                .text(format!("Item number {} with a fairly long label", i)),
        );
    }
    let mut agent = PageAgent::new(doc);
    for max in [64, 500, 2_000] {
        let (_, rendered) = agent.render(
            &SnapshotOptions::default(),
            &RenderOptions::default().with_max_chars_total(max),
        );
        let rendered = rendered.unwrap();
        assert!(rendered.text.chars().count() <= max);
        assert!(rendered.truncated);
        assert!(rendered.truncate_reasons.contains(TruncateReason::MaxCharsTotal));
    }
}
