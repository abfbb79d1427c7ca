//! Message command - post a message from the application to the agent

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome, InboundMessage};
use crate::cli::args::{MessageArgs, MessageKind};
use crate::config::Config;
use crate::error::{OffcacheError, OffcacheResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::sync::oneshot;

/// Execute the message command
///
/// Every message carries a reply port; a reply, if any, is printed as JSON.
pub async fn execute(args: MessageArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let data = message_data(&args)?;
    let sim = Simulator::new(config, state_dir)?;

    let (reply, mut replies) = oneshot::channel();
    match sim
        .agent
        .handle(Event::Message {
            data,
            reply: Some(reply),
        })
        .await?
    {
        EventOutcome::MessageHandled => {}
        other => return Err(unexpected(other)),
    }

    match replies.try_recv() {
        Ok(value) => println!("{}", serde_json::to_string(&value)?),
        Err(_) => ui::step_ok(&UiContext::detect(), "Message delivered"),
    }
    Ok(())
}

fn message_data(args: &MessageArgs) -> OffcacheResult<serde_json::Value> {
    if let Some(raw) = &args.json {
        return serde_json::from_str(raw)
            .map_err(|e| OffcacheError::MessageMalformed(e.to_string()));
    }

    let message = match args.kind {
        Some(MessageKind::SkipWaiting) => InboundMessage::SkipWaiting,
        Some(MessageKind::GetVersion) => InboundMessage::GetVersion,
        None => return Err(OffcacheError::User("No message given".to_string())),
    };
    Ok(serde_json::to_value(message)?)
}
