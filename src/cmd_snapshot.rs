//! `pagelens snapshot` handler.

use std::path::Path;

use tracing::debug;

use pagelens_config::Config;
use pagelens_tools_page::{PageSession, SessionSettings};

use crate::load_fixture;

pub(crate) struct SnapshotArgs {
    pub json: bool,
    pub all: bool,
    pub cursor: bool,
    pub scope: Option<String>,
    pub full: bool,
}

pub(crate) async fn run(config: &Config, fixture: &Path, args: SnapshotArgs) -> anyhow::Result<()> {
    let document = load_fixture(fixture)?;
    let settings = SessionSettings::from(config);

    let mut options = settings.snapshot.clone();
    if args.all {
        options.interactive_only = false;
    }
    if args.cursor {
        options.cursor_interactive = true;
    }
    if args.scope.is_some() {
        options.scope = args.scope;
    }
    let mut render_options = settings.render.clone();
    if args.full {
        render_options.compact = false;
    }

    let session = PageSession::with_settings(document, settings);
    let (envelope, rendered) = session.snapshot(options, render_options).await?;

    if let Some(err) = &envelope.error {
        anyhow::bail!("{}: {}", err.code, err.message);
    }
    if let Some(stats) = &envelope.body.stats {
        debug!(
            refs = envelope.body.refs.len(),
            visited = stats.visited,
            truncated = stats.truncated(),
            "Snapshot rendered"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if let Some(rendered) = rendered {
        println!("{}", rendered.text);
    }
    Ok(())
}
