//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, StorageKind};
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::Scope;
use crate::ui::{self, UiContext};
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "general.audit_log",
    "cache.generation",
    "cache.scope",
    "cache.shell_document",
    "cache.excluded_schemes",
    "cache.storage",
    "cache.storage_dir",
    "manifest.entries",
    "sync.tag",
    "notification.tag",
    "notification.default_title",
    "notification.default_body",
    "notification.icon",
    "notification.badge",
    "notification.vibrate",
    "notification.view_title",
    "notification.dismiss_title",
    "notification.open_url",
    "network.user_agent",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> OffcacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> OffcacheResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> OffcacheResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> OffcacheResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if !VALID_KEYS.contains(&key) {
        // The error itself is reported once by the caller
        eprintln!("Valid keys:");
        for key in VALID_KEYS {
            eprintln!("  {}", key);
        }
        return Err(OffcacheError::User(format!("Unknown config key: {}", key)));
    }
    apply(&mut config, key, value)?;

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one dot-separated key to the config, validating the value
fn apply(config: &mut Config, key: &str, value: &str) -> OffcacheResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,

        ["cache", "generation"] => config.cache.generation = parse_non_empty(key, value)?,
        ["cache", "scope"] => {
            Scope::parse(value)?;
            config.cache.scope = value.to_string();
        }
        ["cache", "shell_document"] => config.cache.shell_document = parse_non_empty(key, value)?,
        ["cache", "excluded_schemes"] => config.cache.excluded_schemes = parse_list(value),
        ["cache", "storage"] => config.cache.storage = parse_storage(value)?,
        ["cache", "storage_dir"] => {
            config.cache.storage_dir = (!value.is_empty()).then(|| PathBuf::from(value))
        }

        ["manifest", "entries"] => config.manifest.entries = parse_list(value),

        ["sync", "tag"] => config.sync.tag = parse_non_empty(key, value)?,

        ["notification", "tag"] => config.notification.tag = value.to_string(),
        ["notification", "default_title"] => config.notification.default_title = value.to_string(),
        ["notification", "default_body"] => config.notification.default_body = value.to_string(),
        ["notification", "icon"] => config.notification.icon = value.to_string(),
        ["notification", "badge"] => config.notification.badge = value.to_string(),
        ["notification", "vibrate"] => {
            config.notification.vibrate = parse_list(value)
                .iter()
                .map(|v| parse_u32(v))
                .collect::<OffcacheResult<_>>()?
        }
        ["notification", "view_title"] => config.notification.view_title = value.to_string(),
        ["notification", "dismiss_title"] => config.notification.dismiss_title = value.to_string(),
        ["notification", "open_url"] => config.notification.open_url = value.to_string(),

        ["network", "user_agent"] => config.network.user_agent = value.to_string(),

        _ => return Err(OffcacheError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_non_empty(key: &str, value: &str) -> OffcacheResult<String> {
    if value.trim().is_empty() {
        return Err(OffcacheError::User(format!("{} cannot be empty", key)));
    }
    Ok(value.to_string())
}

fn parse_log_format(value: &str) -> OffcacheResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(OffcacheError::User(format!(
            "Invalid log format: {}. Use text/json",
            value
        ))),
    }
}

fn parse_storage(value: &str) -> OffcacheResult<StorageKind> {
    match value.to_lowercase().as_str() {
        "disk" => Ok(StorageKind::Disk),
        "memory" => Ok(StorageKind::Memory),
        _ => Err(OffcacheError::User(format!(
            "Invalid storage: {}. Use disk/memory",
            value
        ))),
    }
}

fn parse_bool(value: &str) -> OffcacheResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(OffcacheError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u32(value: &str) -> OffcacheResult<u32> {
    value
        .parse()
        .map_err(|_| OffcacheError::User(format!("Invalid number: {}", value)))
}
