//! Postgres implementation of the `SwiftCodeStore` port.
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) to avoid a
//! compile-time DB requirement.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use swift_core::error::SwiftError;
use swift_core::ports::{Result, SwiftCodeStore};
use swift_core::types::SwiftCodeRecord;

/// Rows per INSERT statement during `replace_all` (6 binds per row, under
/// the 65535 bind-parameter limit).
const BULK_INSERT_CHUNK: usize = 5_000;

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS swift_codes (
        swift_code     TEXT PRIMARY KEY,
        bank_name      TEXT NOT NULL,
        address        TEXT NOT NULL,
        country_iso2   TEXT NOT NULL,
        country_name   TEXT NOT NULL,
        is_headquarter BOOLEAN NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS swift_codes_country_iso2_idx ON swift_codes (country_iso2)",
    r#"
    CREATE INDEX IF NOT EXISTS swift_codes_prefix_hq_idx
        ON swift_codes (swift_code text_pattern_ops, is_headquarter)
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS swift_codes_one_hq_per_institution_idx
        ON swift_codes (left(swift_code, 8))
        WHERE is_headquarter
    "#,
];

#[derive(sqlx::FromRow)]
struct PgSwiftCodeRow {
    swift_code: String,
    bank_name: String,
    address: String,
    country_iso2: String,
    country_name: String,
    is_headquarter: bool,
}

impl From<PgSwiftCodeRow> for SwiftCodeRecord {
    fn from(row: PgSwiftCodeRow) -> Self {
        Self {
            swift_code: row.swift_code,
            bank_name: row.bank_name,
            address: row.address,
            country_iso2: row.country_iso2,
            country_name: row.country_name,
            is_headquarter: row.is_headquarter,
        }
    }
}

fn store_err(e: sqlx::Error) -> SwiftError {
    SwiftError::StoreUnavailable(anyhow!(e))
}

const ONE_HQ_INDEX: &str = "swift_codes_one_hq_per_institution_idx";

/// Map a unique-constraint violation to `DuplicateKey`, anything else to
/// `StoreUnavailable`.
fn insert_err(e: sqlx::Error, key: impl FnOnce() -> String) -> SwiftError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.constraint() == Some(ONE_HQ_INDEX) {
                SwiftError::DuplicateKey("institution already has a headquarters".into())
            } else {
                SwiftError::DuplicateKey(key())
            }
        }
        _ => store_err(e),
    }
}

/// Escape LIKE metacharacters so a prefix matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ── PgSwiftCodeStore ──────────────────────────────────────────

#[derive(Clone)]
pub struct PgSwiftCodeStore {
    pool: PgPool,
}

impl PgSwiftCodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `swift_codes` table and its indexes if they do not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(store_err)?;
        }
        debug!("swift_codes schema ready");
        Ok(())
    }
}

#[async_trait]
impl SwiftCodeStore for PgSwiftCodeStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<SwiftCodeRecord>> {
        let row = sqlx::query_as::<_, PgSwiftCodeRow>(
            r#"
            SELECT swift_code, bank_name, address, country_iso2, country_name, is_headquarter
            FROM swift_codes
            WHERE swift_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_country(&self, iso2: &str) -> Result<Vec<SwiftCodeRecord>> {
        let rows = sqlx::query_as::<_, PgSwiftCodeRow>(
            r#"
            SELECT swift_code, bank_name, address, country_iso2, country_name, is_headquarter
            FROM swift_codes
            WHERE country_iso2 = $1
            ORDER BY swift_code
            "#,
        )
        .bind(iso2)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_prefix(
        &self,
        prefix: &str,
        exclude_code: Option<&str>,
        is_headquarter: Option<bool>,
    ) -> Result<Vec<SwiftCodeRecord>> {
        let rows = sqlx::query_as::<_, PgSwiftCodeRow>(
            r#"
            SELECT swift_code, bank_name, address, country_iso2, country_name, is_headquarter
            FROM swift_codes
            WHERE swift_code LIKE $1 ESCAPE '\'
              AND ($2::text IS NULL OR swift_code <> $2)
              AND ($3::boolean IS NULL OR is_headquarter = $3)
            ORDER BY swift_code
            "#,
        )
        .bind(like_prefix(prefix))
        .bind(exclude_code)
        .bind(is_headquarter)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_unique(&self, record: &SwiftCodeRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO swift_codes
                (swift_code, bank_name, address, country_iso2, country_name, is_headquarter)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&record.swift_code)
        .bind(&record.bank_name)
        .bind(&record.address)
        .bind(&record.country_iso2)
        .bind(&record.country_name)
        .bind(record.is_headquarter)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_err(e, || record.swift_code.clone()))?;
        Ok(())
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM swift_codes WHERE swift_code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected())
    }

    /// Clear and repopulate inside one transaction. Readers keep seeing the
    /// previous catalog until commit; any failure rolls back to it.
    async fn replace_all(&self, records: Vec<SwiftCodeRecord>) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let cleared = sqlx::query("DELETE FROM swift_codes")
            .execute(&mut *tx)
            .await
            .map_err(store_err)?
            .rows_affected();

        let mut inserted = 0u64;
        for chunk in records.chunks(BULK_INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO swift_codes \
                 (swift_code, bank_name, address, country_iso2, country_name, is_headquarter) ",
            );
            builder.push_values(chunk, |mut b, r| {
                b.push_bind(&r.swift_code)
                    .push_bind(&r.bank_name)
                    .push_bind(&r.address)
                    .push_bind(&r.country_iso2)
                    .push_bind(&r.country_name)
                    .push_bind(r.is_headquarter);
            });
            inserted += builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_err(e, || "bulk replace contains a repeated SWIFT code".into()))?
                .rows_affected();
        }

        tx.commit().await.map_err(store_err)?;
        info!(cleared, inserted, "swift_codes replaced");
        Ok(inserted)
    }
}
