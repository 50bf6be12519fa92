//! Serialized, time-bounded access to one page agent.

use std::sync::Arc;
use std::time::Duration;

use pagelens_config::Config;
use pagelens_core::{
    ActionEnvelope, ActionKind, ActionPayload, PageAgent, PageEnvelope, PageKind, PagePayload,
    QueryEnvelope, QueryKind, QueryPayload, Ref, RenderOptions, RenderResult, SnapshotEnvelope,
    SnapshotOptions,
};
use pagelens_protocols::HostDocument;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::SessionError;

/// Defaults applied when a tool call leaves a budget unset.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub snapshot: SnapshotOptions,
    pub render: RenderOptions,
    pub query: QueryPayload,
    pub timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            snapshot: config.snapshot.to_options(),
            render: config.render.to_options(),
            query: config.query.to_payload(),
            timeout: config.session.timeout(),
        }
    }
}

/// Shared handle to a page agent.
///
/// Every call takes the agent's lock, so snapshots, commands and navigation
/// never interleave. Calls run on the blocking pool under the session
/// timeout; a timed-out call keeps running and still holds the lock until it
/// finishes.
pub struct PageSession<D> {
    agent: Arc<Mutex<PageAgent<D>>>,
    settings: Arc<SessionSettings>,
}

impl<D> Clone for PageSession<D> {
    fn clone(&self) -> Self {
        Self {
            agent: Arc::clone(&self.agent),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<D: HostDocument + Send + 'static> PageSession<D> {
    pub fn new(document: D) -> Self {
        Self::with_settings(document, SessionSettings::default())
    }

    pub fn with_settings(document: D, settings: SessionSettings) -> Self {
        Self {
            agent: Arc::new(Mutex::new(PageAgent::new(document))),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Run `f` against the agent under the lock and the session timeout.
    pub async fn run<F, R>(&self, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut PageAgent<D>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let agent = Arc::clone(&self.agent);
        let task = tokio::task::spawn_blocking(move || {
            let mut guard = agent.lock();
            f(&mut guard)
        });
        let timeout = self.settings.timeout;
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SessionError::Worker(e.to_string())),
            Err(_) => {
                let ms = timeout.as_millis() as u64;
                warn!(timeout_ms = ms, "Page call timed out");
                Err(SessionError::Timeout(ms))
            }
        }
    }

    pub async fn snapshot(
        &self,
        options: SnapshotOptions,
        render_options: RenderOptions,
    ) -> Result<(SnapshotEnvelope, Option<RenderResult>), SessionError> {
        debug!(?options, "Session snapshot");
        self.run(move |agent| agent.render(&options, &render_options))
            .await
    }

    pub async fn act(
        &self,
        r: Ref,
        kind: ActionKind,
        payload: ActionPayload,
    ) -> Result<ActionEnvelope, SessionError> {
        self.run(move |agent| agent.act(r, kind, &payload)).await
    }

    /// Raw tokens, as received from a tool call.
    pub async fn act_raw(
        &self,
        token: String,
        kind: String,
        payload: ActionPayload,
    ) -> Result<ActionEnvelope, SessionError> {
        self.run(move |agent| agent.act_raw(&token, &kind, &payload))
            .await
    }

    pub async fn query(
        &self,
        r: Ref,
        kind: QueryKind,
        payload: QueryPayload,
    ) -> Result<QueryEnvelope, SessionError> {
        self.run(move |agent| agent.query(r, kind, &payload)).await
    }

    pub async fn query_raw(
        &self,
        token: String,
        kind: String,
        payload: QueryPayload,
    ) -> Result<QueryEnvelope, SessionError> {
        self.run(move |agent| agent.query_raw(&token, &kind, &payload))
            .await
    }

    pub async fn page(
        &self,
        kind: PageKind,
        payload: PagePayload,
    ) -> Result<PageEnvelope, SessionError> {
        if kind == PageKind::Wait {
            return self.wait(payload).await;
        }
        self.run(move |agent| agent.page(kind, &payload)).await
    }

    pub async fn page_raw(
        &self,
        kind: String,
        payload: PagePayload,
    ) -> Result<PageEnvelope, SessionError> {
        if kind.parse::<PageKind>().is_ok_and(|k| k == PageKind::Wait) {
            return self.wait(payload).await;
        }
        self.run(move |agent| agent.page_raw(&kind, &payload)).await
    }

    /// Open `url` under the lock. Refs from earlier snapshots go stale.
    pub async fn navigate(&self, url: impl Into<String>) -> Result<PageEnvelope, SessionError> {
        let payload = PagePayload::open(url);
        debug!(url = ?payload.url, "Session navigate");
        self.run(move |agent| agent.page(PageKind::Open, &payload))
            .await
    }

    /// Poll the wait condition every `poll_ms` until it holds or `timeout_ms`
    /// elapses; a positive `ms` just sleeps. The lock is released between
    /// polls, so other calls can change the page meanwhile. Running out of
    /// time is reported as `matched: false`, not as an error.
    pub async fn wait(&self, payload: PagePayload) -> Result<PageEnvelope, SessionError> {
        let started = Instant::now();
        if let Some(ms) = payload.fixed_delay_ms() {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            let mut env = self
                .run(|agent| agent.page(PageKind::Wait, &PagePayload::default()))
                .await?;
            env.body.waited_ms = Some(elapsed_ms(started));
            return Ok(env);
        }

        let deadline = started + Duration::from_millis(payload.wait_timeout_ms());
        let poll = Duration::from_millis(payload.wait_poll_ms());
        loop {
            let check = payload.clone();
            let mut env = self
                .run(move |agent| agent.page(PageKind::Wait, &check))
                .await?;
            let matched = env.body.matched.unwrap_or(false);
            let now = Instant::now();
            if matched || !env.ok || now >= deadline {
                env.body.waited_ms = Some(elapsed_ms(started));
                if !matched {
                    debug!(waited_ms = ?env.body.waited_ms, "Wait condition not met");
                }
                return Ok(env);
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
