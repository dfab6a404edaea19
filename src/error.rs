use std::fmt;
use std::io;
use std::path::PathBuf;

/// MySQL server error codes for "unknown database" and "can't drop database; database doesn't exist".
const ER_BAD_DB_ERROR: u16 = 1049;
const ER_DB_DROP_EXISTS: u16 = 1008;

#[derive(Debug)]
pub enum RecoveryError {
    Config(String),
    InvalidName(String),
    Execution { command: String, source: io::Error },
    Backup { exit_code: i32, target: PathBuf },
    Restore { exit_code: i32, source: String },
    Schema { sql: String, source: mysql_async::Error },
    Io(io::Error),
    Serialization(String),
}

impl RecoveryError {
    /// True when a schema statement failed because the schema is not there.
    ///
    /// Callers dropping a schema that may already be gone can ignore this case.
    pub fn is_missing_schema(&self) -> bool {
        match self {
            RecoveryError::Schema {
                source: mysql_async::Error::Server(err),
                ..
            } => err.code == ER_BAD_DB_ERROR || err.code == ER_DB_DROP_EXISTS,
            _ => false,
        }
    }
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RecoveryError::InvalidName(msg) => write!(f, "Invalid name: {}", msg),
            RecoveryError::Execution { command, source } => {
                write!(f, "Failed to execute command [{}]: {}", command, source)
            }
            RecoveryError::Backup { exit_code, target } => write!(
                f,
                "Failed to backup to file with exit code [{}]: {}",
                exit_code,
                target.display()
            ),
            RecoveryError::Restore { exit_code, source } => write!(
                f,
                "Failed to restore from file with exit code [{}]: {}",
                exit_code, source
            ),
            RecoveryError::Schema { sql, source } => {
                write!(f, "Schema statement failed [{}]: {}", sql, source)
            }
            RecoveryError::Io(err) => write!(f, "IO error: {}", err),
            RecoveryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for RecoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecoveryError::Execution { source, .. } => Some(source),
            RecoveryError::Schema { source, .. } => Some(source),
            RecoveryError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RecoveryError {
    fn from(err: io::Error) -> Self {
        RecoveryError::Io(err)
    }
}

impl From<toml::de::Error> for RecoveryError {
    fn from(err: toml::de::Error) -> Self {
        RecoveryError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for RecoveryError {
    fn from(err: toml::ser::Error) -> Self {
        RecoveryError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_error_carries_exit_code_and_target() {
        let err = RecoveryError::Backup {
            exit_code: 2,
            target: PathBuf::from("/var/backups/test_x_nightly.sql"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to backup to file with exit code [2]: /var/backups/test_x_nightly.sql"
        );
    }

    #[test]
    fn test_missing_schema_only_matches_schema_errors() {
        let err = RecoveryError::Config("No schema provided".to_string());
        assert!(!err.is_missing_schema());

        let err = RecoveryError::Schema {
            sql: "DROP DATABASE test;".to_string(),
            source: mysql_async::Error::Server(mysql_async::ServerError {
                code: ER_DB_DROP_EXISTS,
                message: "Can't drop database 'test'; database doesn't exist".to_string(),
                state: "HY000".to_string(),
            }),
        };
        assert!(err.is_missing_schema());
    }
}
