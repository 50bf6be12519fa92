//! Agent-facing facade over one hosted document.

use pagelens_protocols::HostDocument;
use tracing::debug;

use crate::dispatch::{
    ActionKind, ActionPayload, Dispatcher, PageKind, PagePayload, QueryKind, QueryPayload,
};
use crate::envelope::{
    ActionEnvelope, ActionOutcome, Envelope, EnvelopeType, Meta, PageEnvelope, PageOutcome,
    QueryEnvelope, QueryOutcome, SnapshotEnvelope, SnapshotOutcome, SNAPSHOT_VERSION,
};
use crate::error::CommandError;
use crate::refs::Ref;
use crate::render::{render, RenderOptions, RenderResult};
use crate::snapshot::{SnapshotBuilder, SnapshotOptions};

/// Owns a document and its current ref generation.
///
/// Every operation returns an envelope; failures are reported in the
/// envelope's `error` rather than as a `Result`.
#[derive(Debug)]
pub struct PageAgent<D> {
    document: D,
    builder: SnapshotBuilder,
}

impl<D: HostDocument> PageAgent<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            builder: SnapshotBuilder::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the host. Navigating through it invalidates every
    /// outstanding ref.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Build a new snapshot generation.
    pub fn snapshot(&mut self, options: &SnapshotOptions) -> SnapshotEnvelope {
        self.render_inner(options, None).0
    }

    /// Build a new snapshot generation and render it.
    ///
    /// The render result is `None` when the snapshot itself failed.
    pub fn render(
        &mut self,
        options: &SnapshotOptions,
        render_options: &RenderOptions,
    ) -> (SnapshotEnvelope, Option<RenderResult>) {
        self.render_inner(options, Some(render_options))
    }

    fn render_inner(
        &mut self,
        options: &SnapshotOptions,
        render_options: Option<&RenderOptions>,
    ) -> (SnapshotEnvelope, Option<RenderResult>) {
        let meta = Meta::for_document(&self.document);
        match self.builder.build(&self.document, options) {
            Ok(snapshot) => {
                let rendered = render_options.map(|ro| render(&snapshot, ro));
                let envelope = Envelope::ok(EnvelopeType::Snapshot, meta, snapshot.into());
                (envelope, rendered)
            }
            Err(err) => {
                let body = SnapshotOutcome {
                    version: SNAPSHOT_VERSION,
                    url: self.document.url(),
                    title: self.document.title(),
                    ..Default::default()
                };
                (Envelope::err(EnvelopeType::Snapshot, meta, body, err), None)
            }
        }
    }

    pub fn act(&mut self, r: Ref, kind: ActionKind, payload: &ActionPayload) -> ActionEnvelope {
        let result = Dispatcher::new(&mut self.document, self.builder.refs()).act(r, kind, payload);
        let meta = Meta::for_document(&self.document);
        match result {
            Ok(outcome) => Envelope::ok(EnvelopeType::Action, meta, outcome),
            Err(err) => {
                debug!(%r, action = %kind, code = %err.code, "Action failed");
                Envelope::err(
                    EnvelopeType::Action,
                    meta,
                    ActionOutcome::new(r.to_string(), kind.as_str()),
                    err,
                )
            }
        }
    }

    /// Action from raw wire tokens. The kind is validated before the ref.
    pub fn act_raw(&mut self, token: &str, kind: &str, payload: &ActionPayload) -> ActionEnvelope {
        match parse_pair::<ActionKind>(token, kind) {
            Ok((r, kind)) => self.act(r, kind, payload),
            Err(err) => Envelope::err(
                EnvelopeType::Action,
                Meta::for_document(&self.document),
                ActionOutcome::new(token, kind),
                err,
            ),
        }
    }

    pub fn query(&mut self, r: Ref, kind: QueryKind, payload: &QueryPayload) -> QueryEnvelope {
        let result =
            Dispatcher::new(&mut self.document, self.builder.refs()).query(r, kind, payload);
        let meta = Meta::for_document(&self.document);
        match result {
            Ok(outcome) => Envelope::ok(EnvelopeType::Query, meta, outcome),
            Err(err) => Envelope::err(
                EnvelopeType::Query,
                meta,
                QueryOutcome::new(r.to_string(), kind.as_str()),
                err,
            ),
        }
    }

    pub fn query_raw(&mut self, token: &str, kind: &str, payload: &QueryPayload) -> QueryEnvelope {
        match parse_pair::<QueryKind>(token, kind) {
            Ok((r, kind)) => self.query(r, kind, payload),
            Err(err) => Envelope::err(
                EnvelopeType::Query,
                Meta::for_document(&self.document),
                QueryOutcome::new(token, kind),
                err,
            ),
        }
    }

    pub fn page(&mut self, kind: PageKind, payload: &PagePayload) -> PageEnvelope {
        let result = Dispatcher::new(&mut self.document, self.builder.refs()).page(kind, payload);
        let meta = Meta::for_document(&self.document);
        match result {
            Ok(outcome) => Envelope::ok(EnvelopeType::Page, meta, outcome),
            Err(err) => Envelope::err(EnvelopeType::Page, meta, PageOutcome::new(kind.as_str()), err),
        }
    }

    pub fn page_raw(&mut self, kind: &str, payload: &PagePayload) -> PageEnvelope {
        match kind.parse::<PageKind>() {
            Ok(kind) => self.page(kind, payload),
            Err(err) => Envelope::err(
                EnvelopeType::Page,
                Meta::for_document(&self.document),
                PageOutcome::new(kind),
                err,
            ),
        }
    }
}

fn parse_pair<K>(token: &str, kind: &str) -> Result<(Ref, K), CommandError>
where
    K: std::str::FromStr<Err = CommandError>,
{
    let kind = kind.parse::<K>()?;
    let r = token.parse::<Ref>()?;
    Ok((r, kind))
}
