use console::style;
use dialoguer::{Confirm, Input, Select};
use schema_recovery::config::{self, RecoveryConfig};
use schema_recovery::{MysqlRecoveryManager, RecoveryError, RecoveryManager, Result};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
enum MenuOption {
    Backup,
    Restore,
    ListBackups,
    CreateSchema,
    DropSchema,
    EditConfiguration,
    Quit,
}

impl std::fmt::Display for MenuOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuOption::Backup => write!(f, "Back up schema"),
            MenuOption::Restore => write!(f, "Restore from backup"),
            MenuOption::ListBackups => write!(f, "List backups"),
            MenuOption::CreateSchema => write!(f, "Create schema"),
            MenuOption::DropSchema => write!(f, "Drop schema"),
            MenuOption::EditConfiguration => write!(f, "Edit configuration"),
            MenuOption::Quit => write!(f, "Quit"),
        }
    }
}

fn display_header() {
    println!();
    println!("{}", style("╔════════════════════════════════════════╗").cyan());
    println!("{}", style("║         Schema Recovery Manager        ║").cyan());
    println!("{}", style("╚════════════════════════════════════════╝").cyan());
    println!();
}

fn display_summary(config: &RecoveryConfig, manager: &MysqlRecoveryManager) {
    println!("{}", style("Current Configuration:").bold());
    println!(
        "  Server: {}",
        style(format!("{}@{}:{}", config.username, config.hostname, config.effective_port())).cyan()
    );
    println!("  Schema: {}", style(&config.schema).cyan());
    println!("  Backup directory: {}", style(manager.backup_path().display()).cyan());
    println!(
        "  Programs: {} / {}",
        style(config.backup_command()).dim(),
        style(config.restore_command()).dim()
    );
    println!();
}

fn prompt_error(e: dialoguer::Error) -> RecoveryError {
    RecoveryError::Config(e.to_string())
}

pub async fn run_menu(shutdown: Arc<AtomicUsize>) -> Result<()> {
    let mut config = config::load()?;
    if !config::exists() || config::validate(&config).is_err() {
        println!(
            "\n{}",
            style("No usable configuration found. Starting setup wizard...").yellow()
        );
        config = super::wizard::run_setup(&config)?;
    }
    let mut manager = MysqlRecoveryManager::new(config.clone())?;

    let menu_items = vec![
        MenuOption::Backup,
        MenuOption::Restore,
        MenuOption::ListBackups,
        MenuOption::CreateSchema,
        MenuOption::DropSchema,
        MenuOption::EditConfiguration,
        MenuOption::Quit,
    ];

    loop {
        if shutdown.load(Ordering::Relaxed) > 0 {
            break;
        }

        display_header();
        display_summary(&config, &manager);

        let selection = match Select::new()
            .with_prompt("Select an option")
            .items(&menu_items)
            .default(0)
            .interact_opt()
        {
            Ok(Some(s)) => s,
            Ok(None) | Err(_) => break,
        };

        let outcome = match menu_items[selection] {
            MenuOption::Backup => interruptible(&shutdown, backup(&manager)).await,
            MenuOption::Restore => interruptible(&shutdown, restore(&manager)).await,
            MenuOption::ListBackups => list_backups(&manager),
            MenuOption::CreateSchema => interruptible(&shutdown, create_schema(&manager)).await,
            MenuOption::DropSchema => interruptible(&shutdown, drop_schema(&manager)).await,
            MenuOption::EditConfiguration => match super::wizard::run_setup(&config) {
                Ok(updated) => MysqlRecoveryManager::new(updated.clone()).map(|m| {
                    manager = m;
                    config = updated;
                }),
                Err(e) => Err(e),
            },
            MenuOption::Quit => {
                println!("{}", style("Goodbye!").green());
                break;
            }
        };

        if let Err(e) = outcome {
            println!("{}: {}", style("Error").red(), e);
        }
    }

    Ok(())
}

async fn shutdown_requested(shutdown: &AtomicUsize) {
    while shutdown.load(Ordering::Relaxed) == 0 {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Runs `operation` until it finishes or Ctrl+C is pressed. Dropping the
/// operation kills any child process it started.
async fn interruptible<F>(shutdown: &AtomicUsize, operation: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::select! {
        outcome = operation => outcome,
        _ = shutdown_requested(shutdown) => {
            warn!("Operation interrupted; a partially written dump may be left in the backup directory");
            println!("{}", style("Operation interrupted.").yellow());
            Ok(())
        }
    }
}

async fn backup(manager: &MysqlRecoveryManager) -> Result<()> {
    let tag: String = Input::new()
        .with_prompt("Tag")
        .default("manual".to_string())
        .interact_text()
        .map_err(prompt_error)?;

    println!("{}", style("Running backup...").yellow());
    let name = manager.backup(&tag).await?;
    println!("{}", style(format!("✓ Backup written: {}", name)).green());
    Ok(())
}

async fn restore(manager: &MysqlRecoveryManager) -> Result<()> {
    let mut backups = manager.list_backups()?;
    if backups.is_empty() {
        println!("{}", style("No backups found.").yellow());
        return Ok(());
    }
    backups.sort();
    backups.reverse();

    let selection = Select::new()
        .with_prompt("Select backup to restore")
        .items(&backups)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?;
    let Some(selection) = selection else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt(format!("Restore {} into the schema?", backups[selection]))
        .default(false)
        .interact()
        .map_err(prompt_error)?;
    if !confirmed {
        return Ok(());
    }

    println!("{}", style("Running restore...").yellow());
    manager.restore(&backups[selection]).await?;
    println!("{}", style("✓ Restore complete").green());
    Ok(())
}

fn list_backups(manager: &MysqlRecoveryManager) -> Result<()> {
    let mut backups = manager.list_backups()?;
    backups.sort();

    println!("\n{}", style("=== Backups ===").cyan().bold());
    if backups.is_empty() {
        println!("  {}", style("None").dim());
    }
    for name in &backups {
        println!("  {}", name);
    }
    Ok(())
}

async fn create_schema(manager: &MysqlRecoveryManager) -> Result<()> {
    manager.create_database().await?;
    println!("{}", style("✓ Schema created").green());
    Ok(())
}

async fn drop_schema(manager: &MysqlRecoveryManager) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt("Drop the schema and all its data?")
        .default(false)
        .interact()
        .map_err(prompt_error)?;
    if !confirmed {
        return Ok(());
    }

    match manager.drop_database().await {
        Ok(()) => println!("{}", style("✓ Schema dropped").green()),
        Err(e) if e.is_missing_schema() => {
            println!("{}", style("Schema does not exist, nothing to drop.").yellow())
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
