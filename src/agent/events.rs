//! Inbound events and their dispatch
//!
//! Each host lifecycle event maps to one [`EventHandler`] method. Work that
//! must finish before the host commits an event, but that the caller should
//! not wait on (such as storing a fetched response), is registered on the
//! event's [`Lifetime`].

use super::intercept::FetchOutcome;
use super::lifecycle::{ActivateReport, InstallReport};
use super::messaging::SyncOutcome;
use super::notify::NotificationClick;
use crate::error::OffcacheResult;
use crate::fetch::Request;
use async_trait::async_trait;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

/// One-shot channel a message sender provides for the reply
pub type ReplyPort = oneshot::Sender<serde_json::Value>;

/// Events delivered by the host
#[derive(Debug)]
pub enum Event {
    Install,
    Activate,
    Fetch(Request),
    Sync {
        tag: String,
    },
    Message {
        data: serde_json::Value,
        reply: Option<ReplyPort>,
    },
    Push {
        data: Option<Vec<u8>>,
    },
    NotificationClick(NotificationClick),
}

impl Event {
    /// Host event name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Fetch(_) => "fetch",
            Self::Sync { .. } => "sync",
            Self::Message { .. } => "message",
            Self::Push { .. } => "push",
            Self::NotificationClick(_) => "notificationclick",
        }
    }
}

/// Result of handling an event
#[derive(Debug)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    Fetched(FetchOutcome),
    Synced(SyncOutcome),
    MessageHandled,
    PushHandled,
    NotificationClickHandled,
}

/// One method per inbound event kind
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn install(&self) -> OffcacheResult<InstallReport>;

    async fn activate(&self) -> OffcacheResult<ActivateReport>;

    async fn fetch(&self, request: Request, lifetime: &Lifetime) -> OffcacheResult<FetchOutcome>;

    /// Sync failures are reported in the outcome, never as errors
    async fn sync(&self, tag: &str) -> SyncOutcome;

    async fn message(
        &self,
        data: serde_json::Value,
        reply: Option<ReplyPort>,
    ) -> OffcacheResult<()>;

    async fn push(&self, data: Option<Vec<u8>>) -> OffcacheResult<()>;

    async fn notification_click(&self, click: NotificationClick) -> OffcacheResult<()>;
}

/// Route an event to the matching handler method
pub async fn dispatch(
    handler: &dyn EventHandler,
    event: Event,
    lifetime: &Lifetime,
) -> OffcacheResult<EventOutcome> {
    Ok(match event {
        Event::Install => EventOutcome::Installed(handler.install().await?),
        Event::Activate => EventOutcome::Activated(handler.activate().await?),
        Event::Fetch(request) => EventOutcome::Fetched(handler.fetch(request, lifetime).await?),
        Event::Sync { tag } => EventOutcome::Synced(handler.sync(&tag).await),
        Event::Message { data, reply } => {
            handler.message(data, reply).await?;
            EventOutcome::MessageHandled
        }
        Event::Push { data } => {
            handler.push(data).await?;
            EventOutcome::PushHandled
        }
        Event::NotificationClick(click) => {
            handler.notification_click(click).await?;
            EventOutcome::NotificationClickHandled
        }
    })
}

/// Background work an event must finish before the host commits it
#[derive(Debug, Default)]
pub struct Lifetime {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Spawn `task` and extend the event until it completes
    pub fn wait_until<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        self.pending_tasks().push(handle);
    }

    /// Number of registered tasks not yet awaited by [`Lifetime::settle`]
    pub fn pending(&self) -> usize {
        self.pending_tasks().len()
    }

    /// Await every registered task, including ones registered meanwhile.
    ///
    /// Returns the number of tasks settled.
    pub async fn settle(&self) -> usize {
        let mut settled = 0;
        loop {
            let batch = std::mem::take(&mut *self.pending_tasks());
            if batch.is_empty() {
                return settled;
            }
            for handle in batch {
                if let Err(e) = handle.await {
                    warn!("Event lifetime task failed: {}", e);
                }
                settled += 1;
            }
        }
    }
}
