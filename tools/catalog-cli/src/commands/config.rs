//! Configuration management commands.

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Result};
use dialoguer::Confirm;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};
use crate::logging::LogFormat;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let store = &ctx.config.store;
    ctx.output.info("[store]");
    ctx.output.kv("base_url", &store.base_url);
    if let Some(media) = &store.media_base_url {
        ctx.output.kv("media_base_url", media);
    }
    ctx.output.kv("timeout_ms", &store.timeout_ms.to_string());
    ctx.output.kv("connect_timeout_ms", &store.connect_timeout_ms.to_string());
    match store.max_retries {
        Some(retries) => ctx.output.kv("max_retries", &retries.to_string()),
        None => ctx.output.kv("max_retries", "(per endpoint)"),
    }

    let query = &ctx.config.query;
    ctx.output.info("[query]");
    ctx.output.kv("page_size", &query.page_size.to_string());
    ctx.output.kv("debounce_ms", &query.debounce_ms.to_string());
    ctx.output.kv("detail_concurrency", &query.detail_concurrency.to_string());

    ctx.output.info("[output]");
    ctx.output.kv("log_format", log_format_name(ctx.config.output.log_format));
    ctx.output.kv("log_level", &ctx.config.output.log_level);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = ctx.config_path.as_ref().and_then(|p| p.to_str()) else {
        bail!("No config file found. Run `catalog config init` to create one.");
    };

    let mut config = CliConfig::load(path)?;
    set_config_value(&mut config, key, value)?;
    config.save(path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        if !std::io::stdin().is_terminal() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            ctx.output.warn("Left existing config untouched");
            return Ok(());
        }
    }

    let content = generate_default_config(&ctx.config.store.base_url);
    fs::write(&config_path, content)?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.validate();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn log_format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Json => "json",
        LogFormat::Human => "human",
    }
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["store", "base_url"] => config.store.base_url.clone(),
        ["store", "media_base_url"] => config.store.media_base_url.clone().unwrap_or_default(),
        ["store", "timeout_ms"] => config.store.timeout_ms.to_string(),
        ["store", "connect_timeout_ms"] => config.store.connect_timeout_ms.to_string(),
        ["store", "max_retries"] => config
            .store
            .max_retries
            .map(|r| r.to_string())
            .unwrap_or_default(),
        ["query", "page_size"] => config.query.page_size.to_string(),
        ["query", "debounce_ms"] => config.query.debounce_ms.to_string(),
        ["query", "detail_concurrency"] => config.query.detail_concurrency.to_string(),
        ["output", "log_format"] => log_format_name(config.output.log_format).to_string(),
        ["output", "log_level"] => config.output.log_level.clone(),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["store", "base_url"] => config.store.base_url = value.to_string(),
        ["store", "media_base_url"] => {
            config.store.media_base_url = (!value.is_empty()).then(|| value.to_string())
        }
        ["store", "timeout_ms"] => config.store.timeout_ms = value.parse()?,
        ["store", "connect_timeout_ms"] => config.store.connect_timeout_ms = value.parse()?,
        ["store", "max_retries"] => {
            config.store.max_retries = if value.is_empty() {
                None
            } else {
                Some(value.parse()?)
            }
        }
        ["query", "page_size"] => config.query.page_size = value.parse()?,
        ["query", "debounce_ms"] => config.query.debounce_ms = value.parse()?,
        ["query", "detail_concurrency"] => config.query.detail_concurrency = value.parse()?,
        ["output", "log_format"] => {
            config.output.log_format = match value {
                "json" => LogFormat::Json,
                "human" => LogFormat::Human,
                other => bail!("log_format must be json or human, got '{}'", other),
            }
        }
        ["output", "log_level"] => config.output.log_level = value.to_string(),
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_values() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "query.detail_concurrency", "4").unwrap();
        set_config_value(&mut config, "store.max_retries", "2").unwrap();
        set_config_value(&mut config, "output.log_format", "json").unwrap();

        assert_eq!(get_config_value(&config, "query.detail_concurrency").unwrap(), "4");
        assert_eq!(get_config_value(&config, "store.max_retries").unwrap(), "2");
        assert_eq!(get_config_value(&config, "output.log_format").unwrap(), "json");

        set_config_value(&mut config, "store.max_retries", "").unwrap();
        assert_eq!(config.store.max_retries, None);
    }

    #[test]
    fn test_rejects_unknown_and_bad_values() {
        let mut config = CliConfig::default();
        assert!(get_config_value(&config, "store.password").is_err());
        assert!(set_config_value(&mut config, "query.page_size", "many").is_err());
        assert!(set_config_value(&mut config, "output.log_format", "xml").is_err());
    }
}
