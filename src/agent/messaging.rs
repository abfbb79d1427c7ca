//! Background sync and application messages

use super::protocol::{InboundMessage, OutboundMessage, VersionReply};
use super::{OfflineAgent, ReplyPort};
use crate::error::{OffcacheError, OffcacheResult};
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Result of a sync event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Tag not handled by this agent
    Ignored,
    /// Data reconciled and `notified` sessions told about it
    Synced { notified: usize },
    /// Sync failed; already logged
    Failed { reason: String },
}

impl OfflineAgent {
    /// Reconcile deferred data for a known sync tag and tell every session.
    ///
    /// Failures are logged and reported in the outcome, never escalated.
    pub async fn handle_sync(&self, tag: &str) -> SyncOutcome {
        if tag != self.config.sync_tag {
            debug!("Ignoring sync tag {}", tag);
            return SyncOutcome::Ignored;
        }

        match self.sync_and_notify(tag).await {
            Ok(notified) => SyncOutcome::Synced { notified },
            Err(e) => {
                error!("Background sync failed: {}", e);
                SyncOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn sync_and_notify(&self, tag: &str) -> OffcacheResult<usize> {
        self.host.data_sync.reconcile(tag).await?;

        let clients = self.host.clients.match_all().await?;
        let message = serde_json::to_value(OutboundMessage::earnings_synced(Utc::now()))?;

        let mut notified = 0;
        for client in &clients {
            match self.host.clients.post_message(client, message.clone()).await {
                Ok(()) => notified += 1,
                Err(e) => warn!("Failed to notify client {}: {}", client.id, e),
            }
        }

        info!("Background sync complete, notified {} client(s)", notified);
        Ok(notified)
    }

    /// Handle `SKIP_WAITING` and `GET_VERSION`; ignore anything else
    pub async fn handle_message(
        &self,
        data: serde_json::Value,
        reply: Option<ReplyPort>,
    ) -> OffcacheResult<()> {
        match InboundMessage::parse(&data) {
            Some(InboundMessage::SkipWaiting) => {
                info!("Skip waiting requested by client");
                self.host.registration.skip_waiting().await
            }
            Some(InboundMessage::GetVersion) => {
                let port = reply.ok_or(OffcacheError::MissingReplyPort)?;
                let version = VersionReply {
                    version: self.config.generation.clone(),
                };
                port.send(serde_json::to_value(version)?)
                    .map_err(|_| OffcacheError::ReplyClosed)
            }
            None => {
                debug!("Ignoring message {}", data);
                Ok(())
            }
        }
    }
}
