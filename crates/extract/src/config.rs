//! Connection parameters for the relational store.

use std::fmt;

use sqlx::postgres::PgConnectOptions;

use crate::error::{ExtractError, Result};

/// Default Postgres port
pub const DEFAULT_PORT: u16 = 5432;

/// Where the source catalog lives and who to log in as.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl PostgresConfig {
    /// Reject parameters that can never produce a working connection.
    ///
    /// An empty password is allowed (trust / peer authentication).
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(ExtractError::InvalidConfig("port must be non-zero".to_string()));
        }
        if self.database.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("database name is empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("user name is empty".to_string()));
        }
        Ok(())
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PostgresConfig {
        PostgresConfig {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: "imdb".to_string(),
            user: "postgres".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_empty_password_is_allowed() {
        let mut cfg = config();
        cfg.password.clear();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_fields() {
        let mut cfg = config();
        cfg.database = "  ".to_string();
        assert!(matches!(cfg.validate(), Err(ExtractError::InvalidConfig(_))));

        let mut cfg = config();
        cfg.user.clear();
        assert!(matches!(cfg.validate(), Err(ExtractError::InvalidConfig(_))));

        let mut cfg = config();
        cfg.port = 0;
        assert!(matches!(cfg.validate(), Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let printed = format!("{:?}", config());
        assert!(printed.contains("localhost"));
        assert!(!printed.contains("hunter2"));
    }
}
