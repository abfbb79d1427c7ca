//! The offline cache agent
//!
//! Reacts to host lifecycle events for a single-page application:
//!
//! | Event | Handler |
//! |-------|---------|
//! | install | Pre-cache the manifest into the current generation |
//! | activate | Delete stale generations, claim open sessions |
//! | fetch | Cache first, then network; shell document for offline navigations |
//! | sync | Reconcile deferred data, broadcast `EARNINGS_SYNCED` |
//! | message | `SKIP_WAITING`, `GET_VERSION` |
//! | push | Show a notification |
//! | notificationclick | Close, and open the app for "view" |
//!
//! The agent holds no global state: the generation id and everything else
//! it needs arrive through [`AgentConfig`] and [`Host`].

pub mod events;
pub mod intercept;
pub mod lifecycle;
pub mod messaging;
pub mod notify;
pub mod protocol;

pub use events::{dispatch, Event, EventHandler, EventOutcome, Lifetime, ReplyPort};
pub use intercept::{FetchOutcome, ResponseSource};
pub use lifecycle::{ActivateReport, InstallReport, RemoteFailure};
pub use messaging::SyncOutcome;
pub use notify::{NotificationClick, NotificationDefaults, PushPayload, DISMISS_ACTION, VIEW_ACTION};
pub use protocol::{InboundMessage, OutboundMessage, VersionReply};

use crate::cache::{Manifest, DEFAULT_MANIFEST};
use crate::error::OffcacheResult;
use crate::fetch::{Request, Scope};
use crate::host::Host;
use async_trait::async_trait;
use std::sync::Arc;

/// Generation used when none is configured
pub const DEFAULT_GENERATION: &str = "earnings-tracker-v2";
/// Sync tag handled when none is configured
pub const DEFAULT_SYNC_TAG: &str = "earnings-sync";
/// Document served for navigations while offline
pub const DEFAULT_SHELL_DOCUMENT: &str = "./index.html";

/// Everything the agent needs to know, fixed at construction
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Current cache generation id
    pub generation: String,
    /// URL space the agent serves; relative URLs resolve against it
    pub scope: Scope,
    pub manifest: Manifest,
    /// Cached document substituted for failed navigations
    pub shell_document: String,
    /// URL schemes never intercepted
    pub excluded_schemes: Vec<String>,
    /// Sync tag that triggers data reconciliation
    pub sync_tag: String,
    pub notifications: NotificationDefaults,
}

impl AgentConfig {
    /// Defaults for `generation` under `scope`
    pub fn new(generation: impl Into<String>, scope: Scope) -> Self {
        let manifest = Manifest::classify(DEFAULT_MANIFEST, &scope);
        Self {
            generation: generation.into(),
            scope,
            manifest,
            shell_document: DEFAULT_SHELL_DOCUMENT.to_string(),
            excluded_schemes: vec!["chrome-extension".to_string()],
            sync_tag: DEFAULT_SYNC_TAG.to_string(),
            notifications: NotificationDefaults::default(),
        }
    }

    /// Replace the manifest, classifying entries against the scope
    pub fn with_manifest<S: AsRef<str>>(mut self, entries: &[S]) -> Self {
        self.manifest = Manifest::classify(entries, &self.scope);
        self
    }
}

/// The agent: one instance per cache generation
#[derive(Clone)]
pub struct OfflineAgent {
    config: Arc<AgentConfig>,
    host: Host,
}

impl OfflineAgent {
    pub fn new(config: AgentConfig, host: Host) -> Self {
        Self {
            config: Arc::new(config),
            host,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current generation id
    pub fn version(&self) -> &str {
        &self.config.generation
    }

    /// Dispatch an event and settle its lifetime before returning
    pub async fn handle(&self, event: Event) -> OffcacheResult<EventOutcome> {
        let lifetime = Lifetime::new();
        let outcome = dispatch(self, event, &lifetime).await;
        lifetime.settle().await;
        outcome
    }
}

#[async_trait]
impl EventHandler for OfflineAgent {
    async fn install(&self) -> OffcacheResult<InstallReport> {
        self.handle_install().await
    }

    async fn activate(&self) -> OffcacheResult<ActivateReport> {
        self.handle_activate().await
    }

    async fn fetch(&self, request: Request, lifetime: &Lifetime) -> OffcacheResult<FetchOutcome> {
        self.handle_fetch(request, lifetime).await
    }

    async fn sync(&self, tag: &str) -> SyncOutcome {
        self.handle_sync(tag).await
    }

    async fn message(
        &self,
        data: serde_json::Value,
        reply: Option<ReplyPort>,
    ) -> OffcacheResult<()> {
        self.handle_message(data, reply).await
    }

    async fn push(&self, data: Option<Vec<u8>>) -> OffcacheResult<()> {
        self.handle_push(data).await
    }

    async fn notification_click(&self, click: NotificationClick) -> OffcacheResult<()> {
        self.handle_notification_click(click).await
    }
}
