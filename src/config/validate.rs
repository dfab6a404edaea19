use super::RecoveryConfig;
use crate::error::{RecoveryError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks that every required property is present and that the backup
/// directory is usable. Stops at the first problem found.
pub fn validate(config: &RecoveryConfig) -> Result<()> {
    if is_blank(&config.username) {
        return Err(RecoveryError::Config("No username provided".to_string()));
    }
    if is_blank(&config.password) {
        return Err(RecoveryError::Config("No password provided".to_string()));
    }
    if is_blank(&config.hostname) {
        return Err(RecoveryError::Config("No hostname provided".to_string()));
    }
    if is_blank(&config.schema) {
        return Err(RecoveryError::Config("No schema provided".to_string()));
    }
    if is_blank(&config.backup_path.to_string_lossy()) {
        return Err(RecoveryError::Config("No backup path provided".to_string()));
    }
    validate_backup_path(&config.backup_path)
}

fn validate_backup_path(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(RecoveryError::Config(format!(
                "Backup path does not exist: {}",
                path.display()
            )))
        }
        Err(e) => {
            return Err(RecoveryError::Config(format!(
                "Backup path is not accessible: {} ({})",
                path.display(),
                e
            )))
        }
    };

    if !metadata.is_dir() {
        return Err(RecoveryError::Config(format!(
            "Backup path is not a directory: {}",
            path.display()
        )));
    }

    let readable = fs::read_dir(path).is_ok();
    let writable = !metadata.permissions().readonly();
    if !readable || !writable || !can_read_write(path) {
        return Err(RecoveryError::Config(format!(
            "Backup path read / write permissions not valid: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Asks the kernel whether this process may read and write `path`.
#[cfg(unix)]
fn can_read_write(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn can_read_write(_path: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn valid_config(backup_path: &Path) -> RecoveryConfig {
        RecoveryConfig {
            username: "root".to_string(),
            password: "secret".to_string(),
            hostname: "localhost".to_string(),
            port: 0,
            schema: "test".to_string(),
            backup_path: backup_path.to_path_buf(),
            backup_command: None,
            restore_command: None,
        }
    }

    fn config_message(result: Result<()>) -> String {
        match result {
            Err(RecoveryError::Config(msg)) => msg,
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let dir = tempdir().unwrap();
        assert!(validate(&valid_config(dir.path())).is_ok());
    }

    #[test]
    fn test_blank_fields_are_named() {
        let dir = tempdir().unwrap();

        let mut config = valid_config(dir.path());
        config.username = "  ".to_string();
        assert_eq!(config_message(validate(&config)), "No username provided");

        let mut config = valid_config(dir.path());
        config.password = String::new();
        assert_eq!(config_message(validate(&config)), "No password provided");

        let mut config = valid_config(dir.path());
        config.hostname = "\t".to_string();
        assert_eq!(config_message(validate(&config)), "No hostname provided");

        let mut config = valid_config(dir.path());
        config.schema = String::new();
        assert_eq!(config_message(validate(&config)), "No schema provided");

        let mut config = valid_config(dir.path());
        config.backup_path = " ".into();
        assert_eq!(config_message(validate(&config)), "No backup path provided");
    }

    #[test]
    fn test_first_failure_wins() {
        let config = RecoveryConfig::default();
        assert_eq!(config_message(validate(&config)), "No username provided");
    }

    #[test]
    fn test_missing_backup_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let msg = config_message(validate(&valid_config(&missing)));
        assert!(msg.starts_with("Backup path does not exist"));
    }

    #[test]
    fn test_backup_path_is_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("dump.sql");
        File::create(&file_path).unwrap();
        let msg = config_message(validate(&valid_config(&file_path)));
        assert!(msg.starts_with("Backup path is not a directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_backup_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let msg = config_message(validate(&valid_config(&locked)));
        assert!(msg.starts_with("Backup path read / write permissions not valid"));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_owned_by_someone_else() {
        use std::os::unix::fs::MetadataExt;

        // "/" is 0o755 and owned by root: write bits are set, but only root may write.
        let root = Path::new("/");
        let owner = fs::metadata(root).unwrap().uid();
        if unsafe { libc::geteuid() } == owner {
            return;
        }

        let msg = config_message(validate(&valid_config(root)));
        assert!(msg.starts_with("Backup path read / write permissions not valid"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreachable_backup_path_is_not_reported_missing() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("dump.sql");
        File::create(&file_path).unwrap();

        let msg = config_message(validate(&valid_config(&file_path.join("sub"))));
        assert!(msg.starts_with("Backup path is not accessible"), "{}", msg);
    }
}
