use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the league database lives and how to reach it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// A full connection URL. When present the discrete fields below are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
    /// Require an encrypted connection.
    pub encrypt: bool,
    /// Accept the server's certificate without verifying it. Only meaningful with `encrypt`.
    pub trust_server_certificate: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            username: String::new(),
            password: String::new(),
            database_name: String::new(),
            encrypt: false,
            trust_server_certificate: false,
        }
    }
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `database=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "liga.log".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        match &db.url {
            Some(url) if url.trim().is_empty() => Err(ConfigError::ValidationError(
                "database.url is set but empty".to_string(),
            )),
            Some(_) => Ok(()),
            None if db.database_name.trim().is_empty() => Err(ConfigError::ValidationError(
                "either database.url, DATABASE_URL or database.database_name must be set"
                    .to_string(),
            )),
            None if db.host.trim().is_empty() => Err(ConfigError::ValidationError(
                "database.host must not be empty".to_string(),
            )),
            None => Ok(()),
        }
    }
}
