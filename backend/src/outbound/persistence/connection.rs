//! SQLite connections for the Diesel adapters.
//!
//! Repositories open one connection per operation and drop it afterwards;
//! there is no pool. `diesel-async`'s `SyncConnectionWrapper` runs the
//! blocking SQLite calls on Tokio's blocking threads so adapters stay async.

use std::sync::Arc;
use std::time::Duration;

use diesel::Connection as _;
use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Async SQLite connection used by the repositories.
pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;

/// Failures while opening or preparing the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The database file could not be opened.
    #[error("failed to open database: {message}")]
    Open { message: String },
    /// Schema migrations could not be applied.
    #[error("failed to apply migrations: {message}")]
    Migration { message: String },
}

impl ConnectionError {
    /// Create an open error with the given message.
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open {
            message: message.into(),
        }
    }

    /// Create a migration error with the given message.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }
}

/// Opens SQLite connections for a database URL (a file path or `:memory:`).
///
/// # Example
///
/// ```ignore
/// let connector = SqliteConnector::new("placement.db");
/// connector.run_migrations()?;
/// let mut conn = connector.connect().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    database_url: Arc<str>,
    busy_timeout: Duration,
}

impl SqliteConnector {
    /// Create a connector. Writers wait up to five seconds for a lock.
    pub fn new(database_url: impl AsRef<str>) -> Self {
        Self {
            database_url: Arc::from(database_url.as_ref()),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Override how long a connection waits on a locked database.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Database URL this connector opens.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Open a fresh async connection.
    pub async fn connect(&self) -> Result<DbConnection, ConnectionError> {
        let mut conn = DbConnection::establish(&self.database_url)
            .await
            .map_err(|err| ConnectionError::open(err.to_string()))?;
        diesel::sql_query(format!(
            "PRAGMA busy_timeout = {}",
            self.busy_timeout.as_millis()
        ))
        .execute(&mut conn)
        .await
        .map_err(|err| ConnectionError::open(err.to_string()))?;
        Ok(conn)
    }

    /// Apply pending migrations on a blocking connection. Call once at
    /// startup, before serving requests.
    pub fn run_migrations(&self) -> Result<Vec<String>, ConnectionError> {
        let mut conn = SqliteConnection::establish(&self.database_url)
            .map_err(|err| ConnectionError::open(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| ConnectionError::migration(err.to_string()))?
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>();
        info!(
            database = %self.database_url,
            applied = applied.len(),
            "database migrations applied"
        );
        Ok(applied)
    }
}
