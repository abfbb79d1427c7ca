//! Terminal output for the CLI simulator
//!
//! Uses `cliclack` for interactive terminals and falls back to plain,
//! prefix-tagged lines in CI or when output is piped.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::FetchProgress;
pub use prompts::confirm;
