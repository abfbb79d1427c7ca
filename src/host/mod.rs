//! Host platform abstraction
//!
//! The agent never talks to storage, the network or application windows
//! directly. Every outbound call goes through one of these traits so the
//! same agent runs against:
//! - the on-disk store + ureq network used by the CLI
//! - in-memory fakes in tests
//! - any embedding that forwards to a real browser runtime

mod console;
mod disk;
mod http;
mod memory;

pub use console::{ConsoleClients, ConsoleRegistration, LoggingDataSync};
pub use disk::DiskCacheStorage;
pub use http::HttpNetwork;
pub use memory::MemoryCacheStorage;

use crate::cache::CachedEntry;
use crate::error::OffcacheResult;
use crate::fetch::{Request, RequestKey, Response};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Named response cache generations
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a generation, creating it when missing
    async fn open(&self, generation: &str) -> OffcacheResult<()>;

    /// Names of every stored generation
    async fn keys(&self) -> OffcacheResult<Vec<String>>;

    /// Delete a generation and all its entries. Returns whether it existed.
    async fn delete(&self, generation: &str) -> OffcacheResult<bool>;

    /// Look up an entry in a single generation
    async fn lookup(
        &self,
        generation: &str,
        key: &RequestKey,
    ) -> OffcacheResult<Option<CachedEntry>>;

    /// Store an entry, replacing any existing entry with the same key
    async fn put(&self, generation: &str, entry: CachedEntry) -> OffcacheResult<()>;

    /// Store a batch of entries; either all become visible or none do.
    /// A key repeated within the batch keeps its last entry.
    async fn put_all(&self, generation: &str, entries: Vec<CachedEntry>) -> OffcacheResult<()>;

    /// Keys stored in a generation
    async fn entries(&self, generation: &str) -> OffcacheResult<Vec<RequestKey>>;
}

/// Network fetch pipeline
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request. `Err` means no response arrived at all;
    /// HTTP error statuses are returned as responses.
    async fn fetch(&self, request: &Request) -> OffcacheResult<Response>;
}

/// An open application session (window or tab)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub id: Uuid,
    pub url: String,
    pub focused: bool,
}

/// Open application sessions
#[async_trait]
pub trait Clients: Send + Sync {
    /// Every session currently open
    async fn match_all(&self) -> OffcacheResult<Vec<ClientInfo>>;

    /// Take control of every open session
    async fn claim(&self) -> OffcacheResult<()>;

    /// Post a JSON message to one session
    async fn post_message(&self, client: &ClientInfo, message: serde_json::Value)
        -> OffcacheResult<()>;

    /// Bring an existing session to the foreground
    async fn focus(&self, client: &ClientInfo) -> OffcacheResult<()>;

    /// Open a new window on `url`
    async fn open_window(&self, url: &str) -> OffcacheResult<ClientInfo>;
}

/// A user action offered on a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A system notification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub tag: String,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: serde_json::Value,
    pub actions: Vec<NotificationAction>,
}

/// Agent registration with the host
#[async_trait]
pub trait Registration: Send + Sync {
    /// Supersede any previously active instance immediately
    async fn skip_waiting(&self) -> OffcacheResult<()>;

    async fn show_notification(&self, notification: Notification) -> OffcacheResult<()>;

    async fn close_notification(&self, tag: &str) -> OffcacheResult<()>;
}

/// The application's own data-sync backend
#[async_trait]
pub trait DataSync: Send + Sync {
    /// Reconcile data deferred while offline
    async fn reconcile(&self, tag: &str) -> OffcacheResult<()>;
}

/// Every host capability the agent uses
#[derive(Clone)]
pub struct Host {
    pub caches: Arc<dyn CacheStorage>,
    pub network: Arc<dyn Network>,
    pub clients: Arc<dyn Clients>,
    pub registration: Arc<dyn Registration>,
    pub data_sync: Arc<dyn DataSync>,
}

impl Host {
    /// Host backed by console clients/registration and a logging sync step
    pub fn console(
        caches: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        app_url: &str,
    ) -> Self {
        Self {
            caches,
            network,
            clients: Arc::new(ConsoleClients::new(app_url)),
            registration: Arc::new(ConsoleRegistration),
            data_sync: Arc::new(LoggingDataSync),
        }
    }
}
