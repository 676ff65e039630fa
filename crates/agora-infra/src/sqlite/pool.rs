//! SQLite connection pools for the engagement store.
//!
//! Engagement traffic is read-heavy (every page view polls vote counts), so
//! reads go through a multi-connection pool while all writes funnel through a
//! single-connection pool. SQLite permits one writer at a time; capping the
//! write pool at one connection turns write contention into pool queuing
//! instead of SQLITE_BUSY errors. WAL mode keeps readers unblocked while a
//! write transaction is open.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

/// Read/write split over one SQLite database file.
#[derive(Clone)]
pub struct DatabasePool {
    /// Up to 8 read-only connections for SELECT traffic.
    pub reader: SqlitePool,
    /// Exactly one connection; every INSERT/UPDATE/DELETE and every write
    /// transaction runs here.
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools and bring the schema up to date.
    ///
    /// Migrations run on the writer before the readers connect. WAL mode,
    /// `synchronous=NORMAL`, foreign keys, and a 5-second busy timeout apply
    /// to every connection.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(opts.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Default database URL, honoring `AGORA_DATA_DIR` and falling back to
/// `~/.agora/agora.db`.
pub fn default_database_url() -> String {
    let data_dir = std::env::var("AGORA_DATA_DIR").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{home}/.agora")
    });
    format!("sqlite://{data_dir}/agora.db")
}
