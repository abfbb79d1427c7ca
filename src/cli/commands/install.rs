//! Install command - pre-cache the manifest into the current generation

use super::{unexpected, Simulator};
use crate::agent::{Event, EventOutcome, InstallReport};
use crate::audit::AuditEvent;
use crate::config::Config;
use crate::error::OffcacheResult;
use crate::fetch::{Request, Response};
use crate::host::Network;
use crate::ui::{self, FetchProgress, UiContext};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Ticks a progress bar for every fetch passing through
struct ProgressNetwork {
    inner: Arc<dyn Network>,
    progress: Arc<FetchProgress>,
}

#[async_trait]
impl Network for ProgressNetwork {
    async fn fetch(&self, request: &Request) -> OffcacheResult<Response> {
        let result = self.inner.fetch(request).await;
        let status = result.as_ref().ok().map(Response::status);
        self.progress.on_fetched(request.url(), status);
        result
    }
}

/// Execute the install command
pub async fn execute(config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Install");

    let total = config.manifest.entries.len() as u64;
    let progress = Arc::new(FetchProgress::new(&ctx, total));
    let sim = Simulator::with_network(config, state_dir, |inner| {
        Arc::new(ProgressNetwork {
            inner,
            progress: Arc::clone(&progress),
        })
    })?;
    let generation = sim.agent.version().to_string();
    ui::key_value(&ctx, "generation", &generation);

    let result = sim.agent.handle(Event::Install).await;
    progress.finish();

    let report = match result {
        Ok(EventOutcome::Installed(report)) => report,
        Ok(other) => return Err(unexpected(other)),
        Err(e) => {
            sim.audit
                .record(AuditEvent::InstallFailed {
                    generation: &generation,
                    error: e.to_string(),
                })
                .await;
            return Err(e);
        }
    };

    sim.audit.record(AuditEvent::Installed(&report)).await;
    render(&ctx, &report);
    Ok(())
}

fn render(ctx: &UiContext, report: &InstallReport) {
    ui::step_ok_detail(
        ctx,
        "App shell cached",
        &format!("{} entries", report.local_cached.len()),
    );
    if !report.remote_cached.is_empty() {
        ui::step_ok_detail(
            ctx,
            "Remote assets cached",
            &format!("{} entries", report.remote_cached.len()),
        );
    }
    for failure in &report.remote_failed {
        ui::step_warn_hint(ctx, &format!("Skipped {}", failure.url), &failure.reason);
    }

    if report.remote_failed.is_empty() {
        ui::outro_success(ctx, &format!("Installed {}", report.generation));
    } else {
        ui::outro_warn(
            ctx,
            &format!(
                "Installed {} ({} remote asset(s) unavailable)",
                report.generation,
                report.remote_failed.len()
            ),
        );
    }
}
