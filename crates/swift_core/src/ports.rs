//! Storage port for the catalog.
//!
//! The service, resolver and ingestion pipeline operate exclusively through
//! this trait: `MemorySwiftCodeStore` for tests and local runs,
//! `swift_postgres::PgSwiftCodeStore` for production.

use async_trait::async_trait;

use crate::types::SwiftCodeRecord;

pub use crate::error::Result;

/// All inputs are expected in canonical form; stores do no normalization.
#[async_trait]
pub trait SwiftCodeStore: Send + Sync {
    // ── Queries ──

    async fn find_by_code(&self, code: &str) -> Result<Option<SwiftCodeRecord>>;

    /// All records for a country, ordered by code.
    async fn find_by_country(&self, iso2: &str) -> Result<Vec<SwiftCodeRecord>>;

    /// Records whose code starts with `prefix`, ordered by code.
    ///
    /// `exclude_code` drops one exact code from the result;
    /// `is_headquarter` filters on the flag when set.
    async fn find_by_prefix(
        &self,
        prefix: &str,
        exclude_code: Option<&str>,
        is_headquarter: Option<bool>,
    ) -> Result<Vec<SwiftCodeRecord>>;

    // ── Mutations ──

    /// Insert if absent. Fails with `DuplicateKey` when the code exists, or
    /// when the record is a headquarters and another headquarters shares its
    /// institution prefix, leaving the store unchanged. Both checks are
    /// atomic with the insert, so concurrent creates cannot race past them.
    async fn insert_unique(&self, record: &SwiftCodeRecord) -> Result<()>;

    /// Returns the number of records removed (0 or 1).
    async fn delete_by_code(&self, code: &str) -> Result<u64>;

    /// Clear the store and bulk-insert `records`. Returns the number inserted.
    ///
    /// `records` must satisfy the same uniqueness rules as `insert_unique`;
    /// a violation fails with `DuplicateKey` and keeps the prior contents.
    ///
    /// Implementations in this workspace swap atomically; an implementation
    /// that cannot must document that readers may observe an empty or
    /// partially populated store while this runs.
    async fn replace_all(&self, records: Vec<SwiftCodeRecord>) -> Result<u64>;
}
