use super::*;

use pagelens_core::{ElementSpec, MemoryDocument};
use serde_json::json;

fn document() -> MemoryDocument {
    let mut doc = MemoryDocument::new("https://example.test/login", "Login");
    let body = doc.body();
    doc.append(
        body,
        ElementSpec::new("input")
            .attr("type", "text")
            .attr("aria-label", "Username")
            .rect(10.0, 10.0, 200.0, 30.0),
    );
    doc.append(
        body,
        ElementSpec::new("button")
            .id("go")
            .text("Sign in")
            .rect(10.0, 50.0, 100.0, 30.0),
    );
    doc
}

struct Tools {
    session: PageSession<MemoryDocument>,
    snapshot: PageSnapshotTool<MemoryDocument>,
    act: PageActTool<MemoryDocument>,
    query: PageQueryTool<MemoryDocument>,
    control: PageControlTool<MemoryDocument>,
}

fn tools() -> Tools {
    let session = PageSession::new(document());
    Tools {
        snapshot: PageSnapshotTool::new(session.clone()),
        act: PageActTool::new(session.clone()),
        query: PageQueryTool::new(session.clone()),
        control: PageControlTool::new(session.clone()),
        session,
    }
}

async fn refs(tools: &Tools) -> Vec<String> {
    let result = tools.snapshot.execute(json!({})).await.unwrap();
    let output = result.structured_output.unwrap();
    output["refs"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

#[test]
fn test_definitions() {
    let tools = tools();
    assert_eq!(tools.snapshot.definition().id, "page_snapshot");
    assert_eq!(tools.act.definition().id, "page_act");
    assert_eq!(tools.query.definition().id, "page_query");
    assert_eq!(tools.control.definition().id, "page_control");

    let schema = tools.act.definition().parameters_schema.clone().unwrap();
    assert!(schema["properties"].get("ref").is_some());
    assert!(schema["properties"].get("action").is_some());
    let required = schema["required"].as_array().unwrap();
    assert!(required.contains(&json!("ref")));
}

#[test]
fn test_page_tools_bundle() {
    let session = PageSession::new(document());
    let ids: Vec<String> = crate::page_tools(session)
        .iter()
        .map(|t| t.definition().id.clone())
        .collect();
    assert_eq!(
        ids,
        vec!["page_snapshot", "page_act", "page_query", "page_control"]
    );
}

#[tokio::test]
async fn test_snapshot_returns_outline_and_envelope() {
    let tools = tools();
    let result = tools.snapshot.execute(json!({})).await.unwrap();
    assert!(result.success);
    assert!(result.content.contains("textbox \"Username\""));
    assert!(result.content.contains("button \"Sign in\" [ref=e2]"));
    assert_eq!(result.metadata["refs"], 2);

    let output = result.structured_output.unwrap();
    assert_eq!(output["ok"], true);
    assert_eq!(output["type"], "snapshot");
    assert_eq!(output["url"], "https://example.test/login");
}

#[tokio::test]
async fn test_snapshot_unknown_scope_is_error_result() {
    let tools = tools();
    let result = tools
        .snapshot
        .execute(json!({ "scope": "#missing" }))
        .await
        .unwrap();
    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().starts_with("no_root:"));
    assert_eq!(result.structured_output.unwrap()["error"]["code"], "no_root");
}

#[tokio::test]
async fn test_act_then_query() {
    let tools = tools();
    let refs = refs(&tools).await;
    let input = &refs[0];

    let result = tools
        .act
        .execute(json!({ "ref": input, "action": "fill", "value": "ada" }))
        .await
        .unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.structured_output.unwrap()["action"], "fill");

    let result = tools
        .query
        .execute(json!({ "ref": input, "kind": "value" }))
        .await
        .unwrap();
    assert_eq!(result.content, "ada");
}

#[tokio::test]
async fn test_query_limit_chars() {
    let tools = tools();
    let refs = refs(&tools).await;
    let result = tools
        .query
        .execute(json!({ "ref": refs[1], "kind": "outerHTML", "limit_chars": 10 }))
        .await
        .unwrap();
    let output = result.structured_output.unwrap();
    assert_eq!(output["truncated"], true);
    assert!(result.content.chars().count() <= 10);
}

#[tokio::test]
async fn test_blocked_click_reports_occluder() {
    let tools = tools();
    let refs = refs(&tools).await;
    tools
        .session
        .run(|agent| {
            let body = agent.document().body();
            agent.document_mut().append(
                body,
                ElementSpec::new("div")
                    .id("modal")
                    .style("position", "fixed")
                    .style("z-index", "100")
                    .rect(0.0, 0.0, 1280.0, 720.0),
            );
        })
        .await
        .unwrap();

    let result = tools
        .act
        .execute(json!({ "ref": refs[1], "action": "click" }))
        .await
        .unwrap();
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("element_blocked:"));
    assert!(error.contains("div#modal"));
    let output = result.structured_output.unwrap();
    assert_eq!(output["ref"], refs[1].as_str());
    assert_eq!(output["action"], "click");
}

#[tokio::test]
async fn test_stale_ref_after_new_snapshot_is_error_result() {
    let tools = tools();
    let first = refs(&tools).await;
    refs(&tools).await;
    let result = tools
        .act
        .execute(json!({ "ref": first[1], "action": "click" }))
        .await
        .unwrap();
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("ref_not_found:"));
}

#[tokio::test]
async fn test_missing_parameters_are_rejected() {
    let tools = tools();
    match tools.act.execute(json!({ "action": "click" })).await {
        Err(ToolError::InvalidParameters(msg)) => assert!(msg.contains("ref")),
        other => panic!("Expected InvalidParameters, got {:?}", other),
    }
    match tools.query.execute(json!({ "ref": "e1" })).await {
        Err(ToolError::InvalidParameters(msg)) => assert!(msg.contains("kind")),
        other => panic!("Expected InvalidParameters, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unsupported_action_is_error_result() {
    let tools = tools();
    let refs = refs(&tools).await;
    let result = tools
        .act
        .execute(json!({ "ref": refs[0], "action": "drag" }))
        .await
        .unwrap();
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("unsupported_action:"));
}

#[tokio::test]
async fn test_control_info_and_typing() {
    let tools = tools();
    let refs = refs(&tools).await;

    let result = tools.control.execute(json!({ "kind": "info" })).await.unwrap();
    assert!(result.success);
    let output = result.structured_output.unwrap();
    assert_eq!(output["title"], "Login");

    tools
        .act
        .execute(json!({ "ref": refs[0], "action": "focus" }))
        .await
        .unwrap();
    let result = tools
        .control
        .execute(json!({ "kind": "char", "text": "hi" }))
        .await
        .unwrap();
    assert!(result.success, "{:?}", result.error);

    let result = tools
        .query
        .execute(json!({ "ref": refs[0], "kind": "value" }))
        .await
        .unwrap();
    assert_eq!(result.content, "hi");
}

#[tokio::test]
async fn test_control_unknown_kind() {
    let tools = tools();
    let result = tools.control.execute(json!({ "kind": "zoom" })).await.unwrap();
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("unsupported_page:"));
}

#[tokio::test]
async fn test_snapshot_text_attr_and_render_budgets() {
    let tools = tools();
    let result = tools
        .snapshot
        .execute(json!({ "max_text_per_node": 5, "max_attr_value_len": 4 }))
        .await
        .unwrap();
    assert!(result.success);
    assert!(result.content.contains("button \"Sign…\""));
    let output = result.structured_output.unwrap();
    assert_eq!(output["refs"]["e1"]["attrs"]["aria-label"], "Use…");

    let result = tools
        .snapshot
        .execute(json!({ "max_rendered_nodes": 1 }))
        .await
        .unwrap();
    assert!(result.success);
    assert!(result.content.contains("truncated=true"));
    assert!(result.content.contains("\"maxNodes\""));
}

#[tokio::test]
async fn test_act_type_and_dblclick() {
    let tools = tools();
    let refs = refs(&tools).await;

    let result = tools
        .act
        .execute(json!({ "ref": refs[0], "action": "type", "text": "ada" }))
        .await
        .unwrap();
    assert!(result.success, "{:?}", result.error);
    let result = tools
        .query
        .execute(json!({ "ref": refs[0], "kind": "value" }))
        .await
        .unwrap();
    assert_eq!(result.content, "ada");

    let result = tools
        .act
        .execute(json!({ "ref": refs[1], "action": "dblclick" }))
        .await
        .unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.structured_output.unwrap()["action"], "dblclick");
}

#[tokio::test]
async fn test_control_navigation_and_wait() {
    let tools = tools();
    let refs = refs(&tools).await;
    tools
        .session
        .run(|agent| {
            agent.document_mut().add_route(
                "https://example.test/welcome",
                "Welcome",
                ElementSpec::new("body").child(ElementSpec::new("h1").text("Hello ada")),
            )
        })
        .await
        .unwrap();

    let result = tools
        .control
        .execute(json!({ "kind": "open", "url": "https://example.test/welcome" }))
        .await
        .unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.structured_output.unwrap()["title"], "Welcome");

    let result = tools
        .act
        .execute(json!({ "ref": refs[1], "action": "click" }))
        .await
        .unwrap();
    assert!(result.error.unwrap().starts_with("ref_not_found:"));

    let result = tools
        .control
        .execute(json!({ "kind": "wait", "text": "Hello", "timeout_ms": 500, "poll_ms": 10 }))
        .await
        .unwrap();
    let output = result.structured_output.unwrap();
    assert_eq!(output["matched"], true);

    let result = tools.control.execute(json!({ "kind": "back" })).await.unwrap();
    let output = result.structured_output.unwrap();
    assert_eq!(output["navigated"], true);
    assert_eq!(output["url"], "https://example.test/login");

    let result = tools.control.execute(json!({ "kind": "reload" })).await.unwrap();
    assert!(result.success, "{:?}", result.error);
}

#[tokio::test]
async fn test_control_open_requires_url() {
    let tools = tools();
    match tools.control.execute(json!({ "kind": "open" })).await {
        Err(ToolError::InvalidParameters(msg)) => assert!(msg.contains("url")),
        other => panic!("Expected InvalidParameters, got {:?}", other),
    }
}
