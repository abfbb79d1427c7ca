//! Sync command - deliver a background sync event

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome, SyncOutcome};
use crate::cli::args::SyncArgs;
use crate::config::Config;
use crate::error::{OffcacheError, OffcacheResult};
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the sync command
pub async fn execute(args: SyncArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let ctx = UiContext::detect();
    let sim = Simulator::new(config, state_dir)?;
    let tag = args.tag.unwrap_or_else(|| config.sync.tag.clone());

    let outcome = match sim.agent.handle(Event::Sync { tag: tag.clone() }).await? {
        EventOutcome::Synced(outcome) => outcome,
        other => return Err(unexpected(other)),
    };

    match outcome {
        SyncOutcome::Ignored => {
            ui::step_warn_hint(
                &ctx,
                &format!("Sync tag '{}' ignored", tag),
                &format!("the agent handles '{}'", config.sync.tag),
            );
            Ok(())
        }
        SyncOutcome::Synced { notified } => {
            ui::step_ok_detail(&ctx, "Synced", &format!("{} client(s) notified", notified));
            Ok(())
        }
        SyncOutcome::Failed { reason } => Err(OffcacheError::Sync(reason)),
    }
}
