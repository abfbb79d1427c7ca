//! offcache - offline cache agent for single-page applications
//!
//! Pre-caches an application shell, answers requests cache-first, rotates
//! cache generations on upgrade, and relays sync, push and notification
//! events to open sessions. Host capabilities sit behind the traits in
//! [`host`], so the same agent runs in tests, in the CLI simulator, or
//! embedded in a real runtime.

pub mod agent;
pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod host;
pub mod ui;

pub use error::{OffcacheError, OffcacheResult};
