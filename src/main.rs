//! offcache - offline cache agent simulator
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use offcache::cli::{commands, Cli, Commands};
use offcache::config::{Config, ConfigManager};
use offcache::error::OffcacheResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> OffcacheResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Loaded config from {}", config_manager.path().display());

    // Completions and config never touch cache state
    match cli.command {
        Commands::Completions { shell } => return commands::completions(shell),
        Commands::Config(args) => return commands::config(args, &config, &config_manager).await,
        _ => {}
    }

    let state_dir = cli
        .state_dir
        .clone()
        .unwrap_or_else(ConfigManager::default_state_dir);
    ConfigManager::ensure_state_dirs(&state_dir).await?;
    debug!("Using state directory {}", state_dir.display());

    match cli.command {
        Commands::Install => commands::install(&config, &state_dir).await,
        Commands::Activate => commands::activate(&config, &state_dir).await,
        Commands::Fetch(args) => commands::fetch(args, &config, &state_dir).await,
        Commands::List(args) => commands::list(args, &config, &state_dir).await,
        Commands::Message(args) => commands::message(args, &config, &state_dir).await,
        Commands::Sync(args) => commands::sync(args, &config, &state_dir).await,
        Commands::Push(args) => commands::push(args, &config, &state_dir).await,
        Commands::Click(args) => commands::click(args, &config, &state_dir).await,
        Commands::Clear(args) => commands::clear(args, &config, &state_dir).await,
        Commands::Completions { .. } | Commands::Config(_) => unreachable!("handled above"),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` overrides
fn init_logging(verbose: u8, config: &Config) {
    let default = match verbose {
        0 => "offcache=warn",
        1 => "offcache=info",
        _ => "offcache=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
