//! Console-backed host pieces used by the CLI simulator
//!
//! There is no real browser behind the CLI, so application sessions and
//! system notifications are rendered to stdout instead.

use super::{ClientInfo, Clients, DataSync, Notification, Registration};
use crate::error::{OffcacheError, OffcacheResult};
use async_trait::async_trait;
use console::style;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// A single simulated application window
#[derive(Debug)]
pub struct ConsoleClients {
    windows: Mutex<Vec<ClientInfo>>,
}

impl ConsoleClients {
    /// Start with one window open on `app_url`
    pub fn new(app_url: &str) -> Self {
        Self {
            windows: Mutex::new(vec![ClientInfo {
                id: Uuid::new_v4(),
                url: app_url.to_string(),
                focused: true,
            }]),
        }
    }

    fn windows(&self) -> std::sync::MutexGuard<'_, Vec<ClientInfo>> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Clients for ConsoleClients {
    async fn match_all(&self) -> OffcacheResult<Vec<ClientInfo>> {
        Ok(self.windows().clone())
    }

    async fn claim(&self) -> OffcacheResult<()> {
        info!("Claimed {} client(s)", self.windows().len());
        Ok(())
    }

    async fn post_message(
        &self,
        client: &ClientInfo,
        message: serde_json::Value,
    ) -> OffcacheResult<()> {
        println!(
            "{} {} {}",
            style("message").cyan(),
            style(client.id).dim(),
            serde_json::to_string(&message)?
        );
        Ok(())
    }

    async fn focus(&self, client: &ClientInfo) -> OffcacheResult<()> {
        let mut windows = self.windows();
        if !windows.iter().any(|w| w.id == client.id) {
            return Err(OffcacheError::Client(format!("no open window {}", client.id)));
        }
        for window in windows.iter_mut() {
            window.focused = window.id == client.id;
        }
        println!("{} {}", style("focus").cyan(), client.url);
        Ok(())
    }

    async fn open_window(&self, url: &str) -> OffcacheResult<ClientInfo> {
        let client = ClientInfo {
            id: Uuid::new_v4(),
            url: url.to_string(),
            focused: true,
        };
        let mut windows = self.windows();
        for window in windows.iter_mut() {
            window.focused = false;
        }
        windows.push(client.clone());
        println!("{} {}", style("open").cyan(), url);
        Ok(client)
    }
}

/// Prints lifecycle calls and notifications
#[derive(Debug, Default)]
pub struct ConsoleRegistration;

#[async_trait]
impl Registration for ConsoleRegistration {
    async fn skip_waiting(&self) -> OffcacheResult<()> {
        info!("Skipping waiting phase");
        Ok(())
    }

    async fn show_notification(&self, notification: Notification) -> OffcacheResult<()> {
        println!(
            "{} {}",
            style("notification").magenta().bold(),
            style(&notification.title).bold()
        );
        println!("  {}", notification.body);
        let actions: Vec<String> = notification
            .actions
            .iter()
            .map(|a| format!("[{}] {}", a.action, a.title))
            .collect();
        println!("  {}", style(actions.join("  ")).dim());
        Ok(())
    }

    async fn close_notification(&self, tag: &str) -> OffcacheResult<()> {
        info!("Closed notification {}", tag);
        Ok(())
    }
}

/// Sync step for applications without a backend: nothing to reconcile
#[derive(Debug, Default)]
pub struct LoggingDataSync;

#[async_trait]
impl DataSync for LoggingDataSync {
    async fn reconcile(&self, tag: &str) -> OffcacheResult<()> {
        info!("Background sync ({}): earnings data synced", tag);
        Ok(())
    }
}
