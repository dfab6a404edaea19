use console::style;
use dialoguer::{Input, Password};
use schema_recovery::config::{self, RecoveryConfig, DEFAULT_BACKUP_COMMAND, DEFAULT_PORT, DEFAULT_RESTORE_COMMAND};
use schema_recovery::{RecoveryError, Result};
use std::fs;
use std::path::PathBuf;

fn prompt_error(e: dialoguer::Error) -> RecoveryError {
    RecoveryError::Config(e.to_string())
}

/// Prompts for every connection property, starting from the values already in `current`.
pub fn run_setup(current: &RecoveryConfig) -> Result<RecoveryConfig> {
    println!("\n{}", style("=== Schema Recovery Setup ===").cyan().bold());

    let hostname: String = Input::new()
        .with_prompt("Host")
        .default(non_empty_or(&current.hostname, "localhost"))
        .interact_text()
        .map_err(prompt_error)?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(if current.port == 0 { DEFAULT_PORT } else { current.port })
        .interact_text()
        .map_err(prompt_error)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .default(non_empty_or(&current.username, "root"))
        .interact_text()
        .map_err(prompt_error)?;

    let password: String = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(prompt_error)?;

    let schema: String = Input::new()
        .with_prompt("Schema")
        .default(current.schema.clone())
        .interact_text()
        .map_err(prompt_error)?;

    let default_dir = if current.backup_path.as_os_str().is_empty() {
        config::config_dir().join("backups")
    } else {
        current.backup_path.clone()
    };
    let backup_path: String = Input::new()
        .with_prompt("Backup directory")
        .default(default_dir.to_string_lossy().to_string())
        .interact_text()
        .map_err(prompt_error)?;
    let backup_path = PathBuf::from(backup_path);
    if !backup_path.exists() {
        println!(
            "{}",
            style(format!("Creating backup directory {}", backup_path.display())).yellow()
        );
        fs::create_dir_all(&backup_path)?;
    }

    let backup_command: String = Input::new()
        .with_prompt("Dump program")
        .default(current.backup_command().to_string())
        .interact_text()
        .map_err(prompt_error)?;

    let restore_command: String = Input::new()
        .with_prompt("Client program")
        .default(current.restore_command().to_string())
        .interact_text()
        .map_err(prompt_error)?;

    let new_config = RecoveryConfig {
        username,
        password,
        hostname,
        port,
        schema,
        backup_path,
        backup_command: override_of(backup_command, DEFAULT_BACKUP_COMMAND),
        restore_command: override_of(restore_command, DEFAULT_RESTORE_COMMAND),
    };

    config::validate(&new_config)?;
    config::save(&new_config)?;
    println!(
        "{}",
        style(format!("Configuration saved to {}", config::config_path().display())).green()
    );

    Ok(new_config)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn override_of(value: String, default: &str) -> Option<String> {
    if value.trim().is_empty() || value == default {
        None
    } else {
        Some(value)
    }
}
