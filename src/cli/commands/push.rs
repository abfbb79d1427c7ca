//! Push command - deliver a push message

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome};
use crate::cli::args::PushArgs;
use crate::config::Config;
use crate::error::OffcacheResult;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the push command
pub async fn execute(args: PushArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let sim = Simulator::new(config, state_dir)?;
    let empty = args.payload.is_none();
    let data = args.payload.map(String::into_bytes);

    match sim.agent.handle(Event::Push { data }).await? {
        EventOutcome::PushHandled => {}
        other => return Err(unexpected(other)),
    }

    if empty {
        ui::step_info(&UiContext::detect(), "Push had no payload, nothing shown");
    }
    Ok(())
}
