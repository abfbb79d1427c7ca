//! Progress indicators with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress over a known number of fetches (e.g. the pre-cache manifest).
///
/// Shows an indicatif bar in interactive mode, one line per fetch in CI.
pub struct FetchProgress {
    bar: Option<ProgressBar>,
}

impl FetchProgress {
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total);
            let template = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Caching  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(template.progress_chars("━╸─"));
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Record one completed fetch
    pub fn on_fetched(&self, url: &str, status: Option<u16>) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
            bar.set_message(shorten(url, 60));
        } else {
            match status {
                Some(code) => println!("  fetched {} ({})", url, code),
                None => println!("  fetch failed {}", url),
            }
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

/// Trim long URLs for single-line display, keeping the tail
fn shorten(url: &str, max: usize) -> String {
    let count = url.chars().count();
    if count <= max {
        return url.to_string();
    }
    let tail: String = url.chars().skip(count - (max - 3)).collect();
    format!("...{}", tail)
}
