use super::Invocation;
use crate::error::{RecoveryError, Result};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Exit code reported when the child was terminated without one (e.g. by a signal).
pub const NO_EXIT_CODE: i32 = -1;

/// Receives every command line just before it is started.
///
/// The [`Invocation`] display already masks the password; observers that print
/// the raw arguments are responsible for their own redaction.
pub trait CommandObserver: Send + Sync {
    fn on_command(&self, invocation: &Invocation);
}

/// Logs the masked command line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CommandObserver for TracingObserver {
    fn on_command(&self, invocation: &Invocation) {
        info!("Executing command: {}", invocation);
    }
}

/// Starts external programs and waits for them to finish.
#[derive(Clone)]
pub struct ProcessRunner {
    observer: Arc<dyn CommandObserver>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl ProcessRunner {
    pub fn new(observer: Arc<dyn CommandObserver>) -> Self {
        Self { observer }
    }

    /// Runs `invocation` to completion and returns its exit code.
    ///
    /// A non-zero exit code is returned as data; only a failure to start or
    /// wait on the process is an error.
    pub async fn run(&self, invocation: &Invocation) -> Result<i32> {
        self.observer.on_command(invocation);

        let output = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RecoveryError::Execution {
                command: invocation.to_string(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(NO_EXIT_CODE);

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("[{}] {}", invocation.program(), line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if exit_code == 0 {
                debug!("[{}] {}", invocation.program(), line);
            } else {
                warn!("[{}] {}", invocation.program(), line);
            }
        }

        debug!("{} exited with code {}", invocation.program(), exit_code);
        Ok(exit_code)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::command::CommandTemplates;
    use crate::config::RecoveryConfig;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl CommandObserver for Recorder {
        fn on_command(&self, invocation: &Invocation) {
            self.seen.lock().unwrap().push(invocation.to_string());
        }
    }

    fn templates_for(backup: &str, restore: &str) -> CommandTemplates {
        CommandTemplates::build(&RecoveryConfig {
            username: "root".to_string(),
            password: "hunter2".to_string(),
            hostname: "localhost".to_string(),
            schema: "test".to_string(),
            backup_command: Some(backup.to_string()),
            restore_command: Some(restore.to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_success_exit_code() {
        let templates = templates_for("true", "true");
        let invocation = templates.backup.substitute(Path::new("/tmp/x.sql"));
        let code = ProcessRunner::default().run(&invocation).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_failure_exit_code_is_data() {
        let templates = templates_for("false", "false");
        let invocation = templates.restore.substitute(Path::new("/tmp/x.sql"));
        let code = ProcessRunner::default().run(&invocation).await.unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_missing_program_is_execution_error() {
        let templates = templates_for("definitely-not-a-real-mysqldump", "true");
        let invocation = templates.backup.substitute(Path::new("/tmp/x.sql"));

        match ProcessRunner::default().run(&invocation).await {
            Err(RecoveryError::Execution { command, .. }) => {
                assert!(command.starts_with("definitely-not-a-real-mysqldump"));
                assert!(!command.contains("hunter2"));
            }
            other => panic!("expected execution error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_observer_sees_masked_command() {
        let recorder = Arc::new(Recorder::default());
        let runner = ProcessRunner::new(recorder.clone());
        let templates = templates_for("true", "true");
        let invocation = templates.backup.substitute(Path::new("/tmp/x.sql"));

        runner.run(&invocation).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            "true -uroot -p**** -hlocalhost --add-drop-table -r /tmp/x.sql test"
        );
    }
}
