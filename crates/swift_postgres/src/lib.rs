//! swift_postgres: PostgreSQL adapter for the SWIFT code catalog.

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

pub mod store;

pub use store::PgSwiftCodeStore;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)), // 10 minutes
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// Open a connection pool for `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        "Connecting to database: {}",
        mask_database_url(&config.database_url)
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connection_timeout);

    if let Some(idle_timeout) = config.idle_timeout {
        pool_options = pool_options.idle_timeout(idle_timeout);
    }

    let pool = pool_options
        .connect(&config.database_url)
        .await
        .inspect_err(|e| warn!("Failed to connect to database: {}", e))?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Connect and make sure the schema exists.
pub async fn open_store(config: &DatabaseConfig) -> anyhow::Result<PgSwiftCodeStore> {
    let pool = connect(config).await?;
    let store = PgSwiftCodeStore::new(pool);
    store.ensure_schema().await?;
    Ok(store)
}

/// Hide the password in a connection string before logging it.
pub fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut masked = parsed.clone();
        if parsed.password().is_some() {
            let _ = masked.set_password(Some("***"));
        }
        masked.to_string()
    } else if url.len() > 20 && url.is_char_boundary(10) && url.is_char_boundary(url.len() - 10) {
        format!("{}***{}", &url[..10], &url[url.len() - 10..])
    } else {
        "***".to_string()
    }
}
