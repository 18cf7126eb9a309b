use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use tokio::sync::{Mutex, MutexGuard, OnceCell};

/// Owns the one database connection the process uses.
///
/// The connection is opened on the first call to [`get_connection`] and kept
/// for the rest of the process. There is no pool: callers take turns through
/// an async mutex, one round trip (or one report transaction) at a time.
///
/// [`get_connection`]: ConnectionProvider::get_connection
#[derive(Debug)]
pub struct ConnectionProvider {
    options: PgConnectOptions,
    handle: OnceCell<Mutex<PgConnection>>,
}

impl ConnectionProvider {
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options,
            handle: OnceCell::new(),
        }
    }

    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self, DbError> {
        Ok(Self::new(connect_options(settings)?))
    }

    /// Returns the shared connection, opening it if this is the first use.
    ///
    /// A failed attempt is not retried here and leaves nothing cached, so the
    /// next call starts over.
    pub async fn get_connection(&self) -> Result<MutexGuard<'_, PgConnection>, DbError> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let conn = PgConnection::connect_with(&self.options)
                    .await
                    .map_err(DbError::ConnectionError)?;
                tracing::info!(
                    host = self.options.get_host(),
                    database = ?self.options.get_database(),
                    "Database connection established."
                );
                Ok::<_, DbError>(Mutex::new(conn))
            })
            .await?;

        Ok(handle.lock().await)
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }
}

/// Builds connect options from either the configured URL or the discrete fields.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    match &settings.url {
        Some(url) => {
            let options = url
                .parse::<PgConnectOptions>()
                .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;
            // A URL may carry its own sslmode; the flags only tighten it.
            if settings.encrypt {
                Ok(options.ssl_mode(ssl_mode(settings)))
            } else {
                Ok(options)
            }
        }
        None => Ok(PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.username)
            .password(&settings.password)
            .database(&settings.database_name)
            .ssl_mode(ssl_mode(settings))),
    }
}

fn ssl_mode(settings: &DatabaseSettings) -> PgSslMode {
    match (settings.encrypt, settings.trust_server_certificate) {
        (false, _) => PgSslMode::Prefer,
        (true, true) => PgSslMode::Require,
        (true, false) => PgSslMode::VerifyFull,
    }
}
