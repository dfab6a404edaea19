//! Schema recovery for MySQL: create and drop a schema, dump it to timestamped
//! `.sql` files with `mysqldump`, and replay those files with `mysql`.

pub mod command;
pub mod config;
pub mod database;
pub mod error;
pub mod log;
pub mod recovery;

pub use config::RecoveryConfig;
pub use error::{RecoveryError, Result};
pub use recovery::{MysqlRecoveryManager, RecoveryManager};
