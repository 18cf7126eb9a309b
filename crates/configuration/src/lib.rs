use crate::error::ConfigError;
use std::env;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, Settings};

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, an optional
/// `config.toml` in the working directory, then `LIGA__SECTION__KEY`
/// environment variables. A `.env` file is read first, and `DATABASE_URL`
/// (or the older `DB_CONN`) fills in `database.url` when nothing else did.
pub fn load_config() -> Result<Settings, ConfigError> {
    // A missing .env is normal outside development.
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(
            config::Environment::with_prefix("LIGA")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut settings = builder.try_deserialize::<Settings>()?;

    if settings.database.url.is_none() {
        settings.database.url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DB_CONN"))
            .ok();
    }

    settings.validate()?;
    Ok(settings)
}

/// Parses settings from a TOML document, without consulting files or the environment.
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
