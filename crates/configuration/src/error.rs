use thiserror::Error;

/// Everything that can stop the tool before it reaches the database.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `config.toml` or a `LIGA__*` variable could not be read or deserialized.
    #[error("Failed to read settings: {0}")]
    LoadError(#[from] config::ConfigError),

    /// The settings parsed but do not describe a usable database or log level.
    #[error("Invalid settings: {0}")]
    ValidationError(String),

    /// A global tracing subscriber was already installed.
    #[error("Failed to initialise logging: {0}")]
    LoggingError(String),
}
