//! swift_server: REST surface and entry points for the SWIFT code catalog.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use swift_core::{MemorySwiftCodeStore, SwiftCodeStore};
use tracing::warn;

use crate::config::ServerConfig;

/// Build the store the entry point injects into the service: Postgres when
/// a database URL is configured, otherwise an empty in-memory catalog.
pub async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn SwiftCodeStore>> {
    match &config.database {
        Some(db) => Ok(Arc::new(swift_postgres::open_store(db).await?)),
        None => {
            warn!("No SWIFT_DATABASE_URL or DATABASE_URL set; using in-memory store");
            Ok(Arc::new(MemorySwiftCodeStore::new()))
        }
    }
}
