//
//  basecamp-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Keys are `default_profile`, `timeout`, or a profile key. A bare profile
//! key (e.g. `account_id`) applies to the active profile; the fully
//! qualified form is `profiles.<name>.<key>`.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, PROFILE_KEYS};

use super::GlobalOptions;

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset a configuration value
    Unset(UnsetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key
    pub key: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args, global),
            ConfigSubcommand::Unset(args) => unset(args, global),
            ConfigSubcommand::List => list(global),
            ConfigSubcommand::Path => path(global),
        }
    }
}

fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let key = qualify(&args.key, &config, global);
    let value = config.get(&key);

    if global.json {
        let result = serde_json::json!({
            "key": key,
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(v) = value {
        println!("{}", v);
    }
    Ok(())
}

fn set(args: &SetArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let key = qualify(&args.key, &config, global);
    config.set(&key, &args.value)?;
    config.save()?;

    if global.json {
        let result = serde_json::json!({
            "success": true,
            "key": key,
            "value": args.value,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} Set {} to {}", style("✓").green(), key, args.value);
    }
    Ok(())
}

fn unset(args: &UnsetArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let key = qualify(&args.key, &config, global);
    config.unset(&key)?;
    config.save()?;

    if !global.json {
        println!("{} Unset {}", style("✓").green(), key);
    }
    Ok(())
}

fn list(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let entries = config.entries();

    if global.json {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else if entries.is_empty() {
        println!("No configuration set");
    } else {
        for (key, value) in entries {
            println!("{}={}", style(key).cyan(), value);
        }
    }
    Ok(())
}

fn path(global: &GlobalOptions) -> Result<()> {
    let path = Config::config_path()?;
    if global.json {
        let result = serde_json::json!({ "path": path.display().to_string() });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

/// Expands a bare profile key to `profiles.<active>.<key>`.
fn qualify(key: &str, config: &Config, global: &GlobalOptions) -> String {
    if PROFILE_KEYS.contains(&key) {
        format!("profiles.{}.{}", config.profile_name(global.profile.as_deref()), key)
    } else {
        key.to_string()
    }
}
