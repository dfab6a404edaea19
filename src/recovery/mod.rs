pub mod artifact;
mod manager;

pub use artifact::{artifact_name, list_artifacts};
pub use manager::{MysqlRecoveryManager, RecoveryManager};
