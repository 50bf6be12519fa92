//! `pagelens exec` and `pagelens tools` handlers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

use pagelens_config::Config;
use pagelens_core::MemoryDocument;
use pagelens_protocols::{Tool, ToolError, ToolResult};
use pagelens_tools_page::{page_tools, PageSession, SessionSettings};

use crate::load_fixture;

/// One scripted tool call.
#[derive(Debug, Deserialize)]
struct Step {
    tool: String,
    #[serde(default = "empty_params")]
    params: serde_json::Value,
}

fn empty_params() -> serde_json::Value {
    serde_json::json!({})
}

fn tools_by_id(session: PageSession<MemoryDocument>) -> HashMap<String, Arc<dyn Tool>> {
    page_tools(session)
        .into_iter()
        .map(|tool| (tool.definition().id.clone(), tool))
        .collect()
}

async fn call(tool: &dyn Tool, params: serde_json::Value) -> Result<ToolResult, ToolError> {
    tool.validate(&params)?;
    tool.execute(params).await
}

/// Run every step and print one JSON result per line. A failed step does not
/// stop the script.
pub(crate) async fn run(config: &Config, fixture: &Path, script: &Path) -> anyhow::Result<()> {
    let document = load_fixture(fixture)?;
    let content = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid script {}", script.display()))?;

    let session = PageSession::with_settings(document, SessionSettings::from(config));
    let tools = tools_by_id(session);

    let mut failed = 0usize;
    for (index, step) in steps.into_iter().enumerate() {
        let Some(tool) = tools.get(&step.tool) else {
            warn!(step = index, tool = %step.tool, "Unknown tool");
            failed += 1;
            println!(
                "{}",
                serde_json::json!({ "step": index, "tool": step.tool, "error": "unknown tool" })
            );
            continue;
        };

        debug!(step = index, tool = %step.tool, "Executing step");
        let line = match call(tool.as_ref(), step.params).await {
            Ok(result) => {
                if !result.success {
                    failed += 1;
                }
                serde_json::json!({ "step": index, "tool": step.tool, "result": result })
            }
            Err(e) => {
                failed += 1;
                serde_json::json!({ "step": index, "tool": step.tool, "error": e.to_string() })
            }
        };
        println!("{}", line);
    }

    info!(failed, "Script finished");
    Ok(())
}

pub(crate) fn print_tools(config: &Config) -> anyhow::Result<()> {
    let session = PageSession::with_settings(
        MemoryDocument::new("about:blank", ""),
        SessionSettings::from(config),
    );
    let definitions: Vec<serde_json::Value> = page_tools(session)
        .iter()
        .map(|tool| tool.definition().to_openai_function())
        .collect();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
