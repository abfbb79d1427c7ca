//! Clear command - delete every cache generation

use super::cache_storage;
use crate::audit::{AuditEvent, AuditLog};
use crate::cli::args::ClearArgs;
use crate::config::Config;
use crate::error::OffcacheResult;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the clear command
pub async fn execute(args: ClearArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let caches = cache_storage(config, state_dir);

    let generations = caches.keys().await?;
    if generations.is_empty() {
        ui::step_info(&ctx, "No cache generations");
        return Ok(());
    }

    let prompt = format!("Delete {} cache generation(s)?", generations.len());
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_warn_hint(&ctx, "Nothing deleted", "Use --yes to skip confirmation");
        return Ok(());
    }

    let mut deleted = vec![];
    for name in generations {
        if caches.delete(&name).await? {
            ui::step_ok(&ctx, &format!("Deleted {}", name));
            deleted.push(name);
        }
    }

    AuditLog::new(config, state_dir)
        .record(AuditEvent::CacheCleared { deleted: &deleted })
        .await;
    ui::outro_success(&ctx, &format!("Cleared {} generation(s)", deleted.len()));
    Ok(())
}
