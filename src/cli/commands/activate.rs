//! Activate command - delete stale generations and claim sessions

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome};
use crate::audit::AuditEvent;
use crate::config::Config;
use crate::error::OffcacheResult;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the activate command
pub async fn execute(config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let ctx = UiContext::detect();
    let sim = Simulator::new(config, state_dir)?;

    let report = match sim.agent.handle(Event::Activate).await? {
        EventOutcome::Activated(report) => report,
        other => return Err(unexpected(other)),
    };

    for name in &report.deleted {
        sim.audit
            .record(AuditEvent::GenerationDeleted {
                generation: name,
                current: &report.generation,
            })
            .await;
        ui::step_ok(&ctx, &format!("Deleted stale generation {}", name));
    }
    sim.audit.record(AuditEvent::Activated(&report)).await;

    if report.deleted.is_empty() {
        ui::step_info(&ctx, "No stale generations");
    }
    ui::step_ok_detail(&ctx, "Activated", &report.generation);
    Ok(())
}
