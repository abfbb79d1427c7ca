//! List command - show cache generations

use super::cache_storage;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::OffcacheResult;
use crate::fetch::RequestKey;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::Path;

/// One stored generation
#[derive(Debug, Serialize)]
struct GenerationRow {
    name: String,
    current: bool,
    entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    keys: Option<Vec<RequestKey>>,
}

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config, state_dir: &Path) -> OffcacheResult<()> {
    let caches = cache_storage(config, state_dir);

    let mut rows = vec![];
    for name in caches.keys().await? {
        let keys = caches.entries(&name).await?;
        rows.push(GenerationRow {
            current: name == config.cache.generation,
            entries: keys.len(),
            keys: args.entries.then_some(keys),
            name,
        });
    }

    if rows.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No cache generations");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => print_plain(&rows),
    }

    Ok(())
}

fn print_table(rows: &[GenerationRow]) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Cache generations");

    println!(
        "{:<32} {:<10} {:>8}",
        style("GENERATION").bold(),
        style("STATE").bold(),
        style("ENTRIES").bold()
    );
    println!("{}", "-".repeat(52));

    for row in rows {
        let state = if row.current {
            style("current").green()
        } else {
            style("stale").dim()
        };
        println!("{:<32} {:<10} {:>8}", row.name, state, row.entries);
        for key in row.keys.iter().flatten() {
            println!("  {}", style(key).dim());
        }
    }

    println!();
    println!("{} generation(s)", rows.len());
}

fn print_plain(rows: &[GenerationRow]) {
    for row in rows {
        println!("{}", row.name);
        for key in row.keys.iter().flatten() {
            println!("  {}", key);
        }
    }
}
