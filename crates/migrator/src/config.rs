//! Connection settings for both stores.
//!
//! Built by the caller (the CLI fills it from flags, environment and `.env`)
//! and validated before any connection is attempted.

use catalog::DEFAULT_DATABASE;
use extract::PostgresConfig;

use crate::error::{MigrateError, Result};

/// Default MongoDB port
pub const DEFAULT_MONGO_PORT: u16 = 27017;

/// Where the document store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl MongoConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_MONGO_PORT,
            database: DEFAULT_DATABASE.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(MigrateError::InvalidConfig("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(MigrateError::InvalidConfig("port must be non-zero".to_string()));
        }
        // MongoDB rejects these characters in database names.
        if self.database.is_empty()
            || self
                .database
                .contains(['/', '\\', '.', ' ', '"', '$', '\0'])
        {
            return Err(MigrateError::InvalidConfig(format!(
                "invalid database name {:?}",
                self.database
            )));
        }
        Ok(())
    }

    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

/// Everything needed to run the migration.
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub mongo: MongoConfig,
    pub postgres: PostgresConfig,
}

impl MigrateConfig {
    pub fn validate(&self) -> Result<()> {
        self.mongo.validate()?;
        self.postgres.validate()?;
        Ok(())
    }
}
