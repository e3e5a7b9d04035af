use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Idle timeout and max lifetime for the single in-memory connection.
/// The database lives only as long as that connection, so the pool must never recycle it.
pub const IN_MEMORY_KEEPALIVE: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Connection pool settings translated into SeaORM `ConnectOptions`.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
            sqlx_logging: false,
        }
    }
}

impl From<configs::DatabaseConfig> for DatabaseConfig {
    fn from(c: configs::DatabaseConfig) -> Self {
        Self {
            url: c.url,
            max_connections: c.max_connections,
            min_connections: c.min_connections,
            connect_timeout: Duration::from_secs(c.connect_timeout_secs),
            acquire_timeout: Duration::from_secs(c.acquire_timeout_secs),
            idle_timeout: Duration::from_secs(c.idle_timeout_secs),
            max_lifetime: Duration::from_secs(c.max_lifetime_secs),
            sqlx_logging: c.sqlx_logging,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self { url: IN_MEMORY_URL.to_string(), ..Default::default() }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with("sqlite:") && self.url.contains(":memory:")
    }

    /// `(max_connections, min_connections)` actually applied to the pool.
    pub fn pool_size(&self) -> (u32, u32) {
        if self.is_in_memory() {
            // every pooled sqlite connection would open its own empty database
            (1, 1)
        } else {
            (self.max_connections, self.min_connections)
        }
    }

    /// `(idle_timeout, max_lifetime)` actually applied to the pool.
    pub fn pool_lifetimes(&self) -> (Duration, Duration) {
        if self.is_in_memory() {
            (IN_MEMORY_KEEPALIVE, IN_MEMORY_KEEPALIVE)
        } else {
            (self.idle_timeout, self.max_lifetime)
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let (max, min) = self.pool_size();
        let (idle, lifetime) = self.pool_lifetimes();
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .max_connections(max)
            .min_connections(min)
            .idle_timeout(idle)
            .max_lifetime(lifetime)
            .sqlx_logging(self.sqlx_logging);
        opt
    }
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(cfg.connect_options()).await?;
    info!(backend = ?db.get_database_backend(), in_memory = cfg.is_in_memory(), "database connected");
    Ok(db)
}

/// Fresh, empty in-memory sqlite database. Schema is not applied.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    connect_with_config(&DatabaseConfig::in_memory()).await
}

pub async fn test_connection(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.ping().await
}
