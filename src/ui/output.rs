//! Step and banner output with a plain-text fallback

use super::context::UiContext;
use console::style;

/// Severity of a step line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Ok,
    Info,
    Warn,
}

impl Level {
    fn tag(self) -> String {
        match self {
            Self::Ok => style("[OK]").green().to_string(),
            Self::Info => style("[INFO]").cyan().to_string(),
            Self::Warn => style("[WARN]").yellow().to_string(),
        }
    }
}

/// Emit one step line: a cliclack log entry, or an indented tagged line
fn step(ctx: &UiContext, level: Level, text: String) {
    if !ctx.use_fancy_output() {
        println!("  {} {}", level.tag(), text);
        return;
    }
    let _ = match level {
        Level::Ok => cliclack::log::success(text),
        Level::Info => cliclack::log::info(text),
        Level::Warn => cliclack::log::warning(text),
    };
}

/// Emit a closing line; `ok` picks the color and plain-mode tag
fn outro(ctx: &UiContext, ok: bool, message: &str) {
    let styled = if ok {
        style(message).green().bold()
    } else {
        style(message).yellow().bold()
    };
    if ctx.use_fancy_output() {
        let _ = cliclack::outro(styled);
    } else {
        let level = if ok { Level::Ok } else { Level::Warn };
        println!();
        println!("{} {}", level.tag(), message);
    }
}

/// Command banner
pub fn intro(ctx: &UiContext, title: &str) {
    let styled = style(title).cyan().bold();
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(styled);
    } else {
        println!("{}\n", styled);
    }
}

pub fn outro_success(ctx: &UiContext, message: &str) {
    outro(ctx, true, message);
}

pub fn outro_warn(ctx: &UiContext, message: &str) {
    outro(ctx, false, message);
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    step(ctx, Level::Ok, message.to_string());
}

/// Success with a dimmed detail, e.g. a count or a path
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(ctx, Level::Ok, format!("{} ({})", message, style(detail).dim()));
}

/// Warning followed by what to do about it
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    step(ctx, Level::Warn, format!("{} - {}", message, style(hint).dim()));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    step(ctx, Level::Info, message.to_string());
}

/// `key: value` line, key dimmed
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}
