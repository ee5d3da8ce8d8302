//! `kiln config`: inspect the effective configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                let mut map = serde_json::Map::new();
                map.insert(key, serde_json::Value::String(value));
                output.json(&serde_json::Value::Object(map))?;
            } else {
                output.print(&value)?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                let value = serde_json::to_value(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
                output.json(&value)?;
                return Ok(());
            }
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let engine = &config.engine;
    let container = &config.container;
    match key {
        "engine.command" => Ok(engine.command.clone()),
        "engine.copy_subcommand" => Ok(engine.copy_subcommand.clone()),
        "engine.data_flag" => Ok(engine.data_flag.clone()),
        "engine.trust_flag" => Ok(engine.trust_flag.clone()),
        "engine.defaults_file" => Ok(engine.defaults_file.clone()),
        "engine.template_subdir" => Ok(engine.template_subdir.clone()),
        "engine.strategy" => Ok(engine.strategy.to_string()),
        "engine.output_selection" => Ok(engine.output_selection.to_string()),
        "container.runtime" => Ok(container.runtime.clone()),
        "container.image" => Ok(container.image.clone()),
        "container.home" => Ok(container.home.clone()),
        "container.map_user" => Ok(container.map_user.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
