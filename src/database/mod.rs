mod admin;
mod endpoint;

pub use admin::{SchemaAdministrator, StatementExecutor};
pub use endpoint::{Endpoint, SchemaStatements};
