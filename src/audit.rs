//! Audit journal for cache lifecycle events
//!
//! One JSON object per line in `<state_dir>/audit.log`:
//!
//! ```text
//! {"data":{...},"event":"generation.deleted","timestamp":"2024-05-01T09:30:00+00:00"}
//! ```

use crate::agent::{ActivateReport, InstallReport};
use crate::config::{schema::Config, ConfigManager};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Journaled events
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum AuditEvent<'a> {
    #[serde(rename = "install")]
    Installed(&'a InstallReport),
    #[serde(rename = "install.failed")]
    InstallFailed { generation: &'a str, error: String },
    #[serde(rename = "activate")]
    Activated(&'a ActivateReport),
    #[serde(rename = "generation.deleted")]
    GenerationDeleted { generation: &'a str, current: &'a str },
    #[serde(rename = "cache.cleared")]
    CacheCleared { deleted: &'a [String] },
}

/// Appends audit events; IO failures are logged, never returned
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    pub fn new(config: &Config, state_dir: &Path) -> Self {
        Self {
            enabled: config.general.audit_log,
            path: ConfigManager::audit_log_path(state_dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn record(&self, event: AuditEvent<'_>) {
        if !self.enabled {
            return;
        }

        let line = match render(&event) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
                return;
            }
        };

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write audit log {}: {}", self.path.display(), e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// Event as a newline-terminated JSON object with a timestamp
fn render(event: &AuditEvent<'_>) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(event)?;
    if let serde_json::Value::Object(fields) = &mut value {
        fields.insert(
            "timestamp".to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339()),
        );
    }
    let mut line = serde_json::to_string(&value)?;
    line.push('\n');
    Ok(line)
}
