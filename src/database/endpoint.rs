use crate::config::RecoveryConfig;

const SCHEME: &str = "mysql";

/// Connection URLs for the server root and for the managed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub root_url: String,
    pub schema_url: String,
}

impl Endpoint {
    pub fn from_config(config: &RecoveryConfig) -> Self {
        let root_url = format!(
            "{}://{}:{}",
            SCHEME,
            config.hostname,
            config.effective_port()
        );
        let schema_url = format!("{}/{}", root_url, config.schema);
        Self {
            root_url,
            schema_url,
        }
    }
}

/// DDL for creating and dropping the managed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatements {
    pub create: String,
    pub drop: String,
}

impl SchemaStatements {
    pub fn for_schema(schema: &str) -> Self {
        Self {
            create: format!(
                "CREATE DATABASE {} CHARACTER SET utf8 COLLATE utf8_general_ci;",
                schema
            ),
            drop: format!("DROP DATABASE {};", schema),
        }
    }
}
