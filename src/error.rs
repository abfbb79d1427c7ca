//! Error types for offcache
//!
//! All modules use `OffcacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for offcache operations
pub type OffcacheResult<T> = Result<T, OffcacheError>;

/// All errors that can occur in offcache
#[derive(Error, Debug)]
pub enum OffcacheError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scope URL {url}: {reason}")]
    InvalidScope { url: String, reason: String },

    // Request errors
    #[error("Invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network fetch failed for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Pre-cache failed for {url}: {reason}")]
    PrecacheFailed { url: String, reason: String },

    // Cache storage errors
    #[error("Cache generation not found: {0}")]
    GenerationNotFound(String),

    #[error("Corrupt cache entry {path}: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    // Messaging errors
    #[error("Malformed message: {0}")]
    MessageMalformed(String),

    #[error("GET_VERSION message arrived without a reply port")]
    MissingReplyPort,

    #[error("Reply port closed before the reply was delivered")]
    ReplyClosed,

    #[error("Invalid push payload: {0}")]
    PushPayload(String),

    // Host errors
    #[error("Client operation failed: {0}")]
    Client(String),

    #[error("Data sync failed: {0}")]
    Sync(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl OffcacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a network error for a URL
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from the network layer
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PrecacheFailed { .. } => {
                Some("Check that the application is being served at the configured cache.scope")
            }
            Self::InvalidScope { .. } => {
                Some("Run: offcache config set cache.scope http://host:port/")
            }
            Self::GenerationNotFound(_) => Some("Run: offcache install"),
            Self::ConfigInvalid { .. } => Some("Run: offcache config init --force"),
            _ => None,
        }
    }
}
