//! Server configuration from environment variables.
//!
//!   SWIFT_DATABASE_URL  Postgres connection string (falls back to DATABASE_URL;
//!                       when neither is set the in-memory store is used)
//!   SWIFT_DB_POOL_SIZE  max pool connections (default: 10)
//!   SWIFT_BIND_ADDR     listen address (default: 0.0.0.0:$PORT, PORT defaults to 3000)

use swift_postgres::DatabaseConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: Option<DatabaseConfig>,
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pool_size = lookup("SWIFT_DB_POOL_SIZE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        let database = lookup("SWIFT_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig::new(url).with_max_connections(pool_size));

        let bind_addr = lookup("SWIFT_BIND_ADDR").unwrap_or_else(|| {
            let port = lookup("PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);
            format!("0.0.0.0:{port}")
        });

        Self {
            database,
            bind_addr,
        }
    }
}
