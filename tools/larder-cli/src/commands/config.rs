//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, LarderConfig, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
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

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("dir", &ctx.config.store.dir);

    ctx.output.info("");
    ctx.output.info("[pricing]");
    ctx.output.kv("currency", &ctx.config.pricing.currency);

    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output
        .kv("shipping_fee", &ctx.config.checkout.shipping_fee.to_string());
    ctx.output.kv("outbox", &ctx.config.checkout.outbox);

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv("path", &ctx.config.catalog.path);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = ctx.config_path.as_ref().and_then(|p| p.to_str()) else {
        bail!("No config file found. Run `larder config init` to create one.");
    };

    let mut config = LarderConfig::load(path)?;
    set_config_value(&mut config, key, value)?;
    config.save(path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.currency() {
        errors.push(format!("pricing.currency: {}", e));
    }

    if ctx.config.checkout.shipping_fee.is_sign_negative()
        && !ctx.config.checkout.shipping_fee.is_zero()
    {
        errors.push("checkout.shipping_fee must not be negative".to_string());
    } else if errors.is_empty() && ctx.config.shipping_fee().is_err() {
        errors.push("checkout.shipping_fee is out of range".to_string());
    }

    if ctx.config.store.dir.trim().is_empty() {
        errors.push("store.dir is required".to_string());
    }

    let catalog = ctx.resolve_path(&ctx.config.catalog.path);
    if !catalog.exists() {
        warnings.push(format!("catalog.path '{}' does not exist", catalog.display()));
    } else if let Err(e) = ctx.catalog() {
        errors.push(format!("catalog: {:#}", e));
    }

    // Print results
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

fn get_config_value(config: &LarderConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["store", "dir"] => Ok(config.store.dir.clone()),
        ["pricing", "currency"] => Ok(config.pricing.currency.clone()),
        ["checkout", "shipping_fee"] => Ok(config.checkout.shipping_fee.to_string()),
        ["checkout", "outbox"] => Ok(config.checkout.outbox.clone()),
        ["catalog", "path"] => Ok(config.catalog.path.clone()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut LarderConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["store", "dir"] => config.store.dir = value.to_string(),
        ["pricing", "currency"] => config.pricing.currency = value.trim().to_uppercase(),
        ["checkout", "shipping_fee"] => config.checkout.shipping_fee = value.trim().parse()?,
        ["checkout", "outbox"] => config.checkout.outbox = value.to_string(),
        ["catalog", "path"] => config.catalog.path = value.to_string(),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}
