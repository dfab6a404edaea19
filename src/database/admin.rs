use super::{Endpoint, SchemaStatements};
use crate::config::RecoveryConfig;
use crate::error::{RecoveryError, Result};
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder};
use tracing::{debug, info, warn};

/// Runs a single statement on an open connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatementExecutor;

impl StatementExecutor {
    /// Executes `sql` and returns the number of affected rows.
    pub async fn execute_update(&self, conn: &mut Conn, sql: &str) -> mysql_async::Result<u64> {
        conn.query_drop(sql).await?;
        Ok(conn.affected_rows())
    }
}

/// Issues schema-level DDL against the configured server.
#[derive(Debug, Clone)]
pub struct SchemaAdministrator {
    username: String,
    password: String,
    endpoint: Endpoint,
    statements: SchemaStatements,
    executor: StatementExecutor,
}

impl SchemaAdministrator {
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            endpoint: Endpoint::from_config(config),
            statements: SchemaStatements::for_schema(&config.schema),
            executor: StatementExecutor,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn statements(&self) -> &SchemaStatements {
        &self.statements
    }

    pub async fn create_database(&self) -> Result<()> {
        info!("Creating schema via {}", self.endpoint.root_url);
        self.execute(&self.endpoint.root_url, &self.statements.create)
            .await
    }

    pub async fn drop_database(&self) -> Result<()> {
        info!("Dropping schema via {}", self.endpoint.schema_url);
        self.execute(&self.endpoint.schema_url, &self.statements.drop)
            .await
    }

    async fn execute(&self, url: &str, sql: &str) -> Result<()> {
        self.execute_inner(url, sql)
            .await
            .map_err(|source| RecoveryError::Schema {
                sql: sql.to_string(),
                source,
            })
    }

    async fn execute_inner(&self, url: &str, sql: &str) -> mysql_async::Result<()> {
        let opts = OptsBuilder::from_opts(Opts::from_url(url)?)
            .user(Some(&self.username))
            .pass(Some(&self.password));

        let mut conn = Conn::new(opts).await?;
        debug!("Executing: {}", sql);
        let outcome = self.executor.execute_update(&mut conn, sql).await;
        let closed = conn.disconnect().await;

        let affected = settle(url, outcome, closed)?;
        debug!("Statement affected {} row(s)", affected);
        Ok(())
    }
}

/// The statement result decides the outcome; a failed disconnect afterwards is only logged.
fn settle(
    url: &str,
    outcome: mysql_async::Result<u64>,
    closed: mysql_async::Result<()>,
) -> mysql_async::Result<u64> {
    if let Err(e) = closed {
        warn!("Failed to close connection to {}: {}", url, e);
    }
    outcome
}
