//! CLI argument definitions using clap derive

use clap::{ArgAction, ArgGroup, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// offcache - offline cache agent for single-page applications
///
/// Simulates the host runtime: each command delivers one lifecycle event
/// (install, activate, fetch, sync, message, push, notification click)
/// to the agent.
#[derive(Parser, Debug)]
#[command(name = "offcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "OFFCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// State directory holding cache generations and the audit log
    #[arg(long, global = true, env = "OFFCACHE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pre-cache the manifest into the current generation
    Install,

    /// Delete stale generations and claim open sessions
    Activate,

    /// Intercept a request: cache first, then network
    Fetch(FetchArgs),

    /// List cache generations
    List(ListArgs),

    /// Send a message from the application to the agent
    Message(MessageArgs),

    /// Deliver a background sync event
    Sync(SyncArgs),

    /// Deliver a push message
    Push(PushArgs),

    /// Deliver a notification click
    Click(ClickArgs),

    /// Delete every cache generation
    Clear(ClearArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Request URL, absolute or relative to the scope
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Treat the request as a top-level page navigation
    #[arg(long)]
    pub navigate: bool,

    /// Write the body to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Also list the entries of each generation
    #[arg(short, long)]
    pub entries: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Messages the application can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageKind {
    /// {"type": "SKIP_WAITING"}
    SkipWaiting,
    /// {"type": "GET_VERSION"}
    GetVersion,
}

/// Arguments for the message command
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("payload").required(true).args(["kind", "json"])))]
pub struct MessageArgs {
    /// Predefined message
    pub kind: Option<MessageKind>,

    /// Raw JSON message
    #[arg(long)]
    pub json: Option<String>,
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Sync tag (defaults to the configured tag)
    #[arg(short, long)]
    pub tag: Option<String>,
}

/// Arguments for the push command
#[derive(Parser, Debug)]
pub struct PushArgs {
    /// JSON payload: {"title": ..., "body": ..., "data": {...}}. Omit for an empty push.
    #[arg(short, long)]
    pub payload: Option<String>,
}

/// Arguments for the click command
#[derive(Parser, Debug)]
pub struct ClickArgs {
    /// Chosen action (view, dismiss); omit for a click on the body
    #[arg(short, long)]
    pub action: Option<String>,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.generation)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
