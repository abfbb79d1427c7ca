//! Message protocol between the agent and application sessions

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Messages the application sends to the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Supersede any waiting instance immediately
    SkipWaiting,
    /// Ask for the current cache generation
    GetVersion,
}

impl InboundMessage {
    /// Parse a message; anything unrecognised yields `None`
    pub fn parse(data: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(data.clone()).ok()
    }
}

/// Reply to [`InboundMessage::GetVersion`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReply {
    pub version: String,
}

/// Messages the agent broadcasts to application sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    /// Deferred earnings data has been reconciled
    EarningsSynced { timestamp: String },
}

impl OutboundMessage {
    /// Sync completion stamped with an ISO-8601 UTC timestamp
    pub fn earnings_synced(at: DateTime<Utc>) -> Self {
        Self::EarningsSynced {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
