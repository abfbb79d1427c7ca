//! Click command - deliver a notification click

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome, NotificationClick};
use crate::cli::args::ClickArgs;
use crate::config::Config;
use crate::error::OffcacheResult;
use std::path::Path;

/// Execute the click command
pub async fn execute(args: ClickArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let sim = Simulator::new(config, state_dir)?;
    let click = NotificationClick::new(config.notification.tag.clone(), args.action);

    match sim.agent.handle(Event::NotificationClick(click)).await? {
        EventOutcome::NotificationClickHandled => Ok(()),
        other => Err(unexpected(other)),
    }
}
