use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Connection pool settings for the primary database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// A private in-memory SQLite database.
    ///
    /// The pool is pinned to one long-lived connection: SQLite drops an
    /// in-memory database as soon as its last connection closes.
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:")
    }
}

/// Open the connection pool described by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let mut opts = ConnectOptions::new(&config.url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if config.is_in_memory() {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.idle_timeout(Duration::from_secs(300));
    }

    let db = Database::connect(opts).await?;
    tracing::info!(
        backend = ?db.get_database_backend(),
        pool = config.max_connections,
        "Database connected"
    );

    Ok(db)
}
