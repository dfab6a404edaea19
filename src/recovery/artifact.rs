use crate::error::{RecoveryError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Component, Path};

pub const ARTIFACT_EXTENSION: &str = ".sql";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `{schema}_{yyyy-MM-dd_HH-mm-ss}_{tag}.sql`
pub fn artifact_name(schema: &str, timestamp: &DateTime<Local>, tag: &str) -> String {
    format!(
        "{}_{}_{}{}",
        schema,
        timestamp.format(TIMESTAMP_FORMAT),
        tag,
        ARTIFACT_EXTENSION
    )
}

/// Tags are free-form, including empty, but may not carry path separators.
pub fn ensure_valid_tag(tag: &str) -> Result<()> {
    if tag.contains(['/', '\\', '\0']) {
        return Err(RecoveryError::InvalidName(format!(
            "tag may not contain path separators: {}",
            tag
        )));
    }
    Ok(())
}

/// Rejects values that would escape the backup directory once joined to it.
pub fn ensure_plain_name(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RecoveryError::InvalidName(format!("empty {}", kind)));
    }

    let mut components = Path::new(value).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain || value.contains(['/', '\\']) {
        return Err(RecoveryError::InvalidName(format!(
            "{} must be a plain file name: {}",
            kind, value
        )));
    }
    Ok(())
}

/// Names of regular `.sql` files directly under `dir`, in directory order.
pub fn list_artifacts(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks; dangling links are skipped.
        let is_file = fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(ARTIFACT_EXTENSION) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_name_format() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            artifact_name("test", &timestamp, "nightly"),
            "test_2024-03-07_09-05-01_nightly.sql"
        );
    }

    #[test]
    fn test_plain_names() {
        assert!(ensure_plain_name("tag", "nightly").is_ok());
        assert!(ensure_plain_name("artifact", "test_2024-03-07_09-05-01_x.sql").is_ok());

        for bad in ["", "  ", ".", "..", "../etc", "a/b", "a\\b", "/abs.sql"] {
            assert!(
                matches!(
                    ensure_plain_name("tag", bad),
                    Err(RecoveryError::InvalidName(_))
                ),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_tags() {
        assert!(ensure_valid_tag("").is_ok());
        assert!(ensure_valid_tag("pre upgrade..v2").is_ok());
        assert!(matches!(
            ensure_valid_tag("../escape"),
            Err(RecoveryError::InvalidName(_))
        ));
        assert!(matches!(
            ensure_valid_tag("a\\b"),
            Err(RecoveryError::InvalidName(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_follows_symlinks() {
        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let real = elsewhere.path().join("real.sql");
        File::create(&real).unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("linked.sql")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path().join("gone.sql"), dir.path().join("dangling.sql"))
            .unwrap();

        let names = list_artifacts(dir.path()).unwrap();
        assert_eq!(names, vec!["linked.sql".to_string()]);
    }

    #[test]
    fn test_list_only_top_level_sql_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.sql")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        fs::create_dir(dir.path().join("nested.sql")).unwrap();
        File::create(dir.path().join("nested.sql").join("c.sql")).unwrap();

        let names = list_artifacts(dir.path()).unwrap();
        assert_eq!(names, vec!["a.sql".to_string()]);
    }
}
