use super::artifact::{artifact_name, ensure_plain_name, ensure_valid_tag, list_artifacts};
use crate::command::{CommandTemplates, ProcessRunner};
use crate::config::{self, RecoveryConfig};
use crate::database::SchemaAdministrator;
use crate::error::{RecoveryError, Result};
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lifecycle operations for one schema and its dump files.
#[async_trait]
pub trait RecoveryManager: Send + Sync {
    async fn create_database(&self) -> Result<()>;
    async fn drop_database(&self) -> Result<()>;
    /// Dumps the schema and returns the artifact name (not the full path).
    async fn backup(&self, tag: &str) -> Result<String>;
    /// Replays the named artifact from the backup directory.
    async fn restore(&self, artifact: &str) -> Result<()>;
    fn list_backups(&self) -> Result<Vec<String>>;
    fn backup_path(&self) -> &Path;
}

/// [`RecoveryManager`] backed by `mysqldump`, `mysql` and a direct connection.
pub struct MysqlRecoveryManager {
    schema: String,
    backup_path: PathBuf,
    templates: CommandTemplates,
    runner: ProcessRunner,
    admin: SchemaAdministrator,
}

impl MysqlRecoveryManager {
    pub fn new(config: RecoveryConfig) -> Result<Self> {
        Self::with_runner(config, ProcessRunner::default())
    }

    /// Same as [`MysqlRecoveryManager::new`] with a caller supplied runner,
    /// typically one carrying a custom [`crate::command::CommandObserver`].
    pub fn with_runner(config: RecoveryConfig, runner: ProcessRunner) -> Result<Self> {
        config::validate(&config)?;

        let backup_path = std::path::absolute(&config.backup_path)?;
        let templates = CommandTemplates::build(&config);
        let admin = SchemaAdministrator::new(&config);

        debug!("Backup template: {}", templates.backup);
        debug!("Restore template: {}", templates.restore);
        info!(
            "Recovery manager ready for schema '{}' with backups in {}",
            config.schema,
            backup_path.display()
        );

        Ok(Self {
            schema: config.schema,
            backup_path,
            templates,
            runner,
            admin,
        })
    }

    pub fn templates(&self) -> &CommandTemplates {
        &self.templates
    }
}

#[async_trait]
impl RecoveryManager for MysqlRecoveryManager {
    async fn create_database(&self) -> Result<()> {
        self.admin.create_database().await?;
        info!("Created schema '{}'", self.schema);
        Ok(())
    }

    async fn drop_database(&self) -> Result<()> {
        self.admin.drop_database().await?;
        info!("Dropped schema '{}'", self.schema);
        Ok(())
    }

    async fn backup(&self, tag: &str) -> Result<String> {
        ensure_valid_tag(tag)?;

        let name = artifact_name(&self.schema, &Local::now(), tag);
        let target = self.backup_path.join(&name);
        info!("Backing up schema '{}' to {}", self.schema, target.display());

        let invocation = self.templates.backup.substitute(&target);
        let exit_code = self.runner.run(&invocation).await?;
        if exit_code != 0 {
            return Err(RecoveryError::Backup { exit_code, target });
        }

        info!("Backup complete: {}", name);
        Ok(name)
    }

    async fn restore(&self, artifact: &str) -> Result<()> {
        ensure_plain_name("artifact", artifact)?;

        let source = self.backup_path.join(artifact);
        info!("Restoring schema '{}' from {}", self.schema, source.display());

        let invocation = self.templates.restore.substitute(&source);
        let exit_code = self.runner.run(&invocation).await?;
        if exit_code != 0 {
            return Err(RecoveryError::Restore {
                exit_code,
                source: artifact.to_string(),
            });
        }

        info!("Restore complete: {}", artifact);
        Ok(())
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        let names = list_artifacts(&self.backup_path)?;
        debug!("Found {} backup(s) in {}", names.len(), self.backup_path.display());
        Ok(names)
    }

    fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}
