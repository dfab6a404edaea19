use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_BACKUP_COMMAND: &str = "mysqldump";
pub const DEFAULT_RESTORE_COMMAND: &str = "mysql";

/// Connection properties and backup location for a single schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecoveryConfig {
    pub username: String,
    pub password: String,
    pub hostname: String,
    /// `0` selects [`DEFAULT_PORT`].
    pub port: u16,
    pub schema: String,
    pub backup_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_command: Option<String>,
}

impl RecoveryConfig {
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        }
    }

    pub fn backup_command(&self) -> &str {
        self.backup_command
            .as_deref()
            .unwrap_or(DEFAULT_BACKUP_COMMAND)
    }

    pub fn restore_command(&self) -> &str {
        self.restore_command
            .as_deref()
            .unwrap_or(DEFAULT_RESTORE_COMMAND)
    }
}
