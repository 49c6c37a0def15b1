//! SwiftCodeService: the request-facing operations of the catalog.
//!
//! Takes the store through `Arc<dyn SwiftCodeStore>` so the same logic runs
//! against Postgres or the in-memory store. Handlers pass raw path/body
//! values; normalization happens here, before any store access.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::SwiftError;
use crate::hierarchy;
use crate::normalize::{institution_prefix, normalize_code, normalize_country};
use crate::ports::{Result, SwiftCodeStore};
use crate::types::{CountrySwiftCodes, NewSwiftCode, SwiftCodeDetail, SwiftCodeRecord};

// ── SwiftCodeService trait ────────────────────────────────────

#[async_trait]
pub trait SwiftCodeService: Send + Sync {
    /// Detail for one code. Headquarters include their branches.
    async fn get_swift_code(&self, raw_code: &str) -> Result<SwiftCodeDetail>;

    /// All codes for a country. An empty result is `NotFound`.
    async fn get_country(&self, raw_iso2: &str) -> Result<CountrySwiftCodes>;

    /// Validate, normalize and insert a new record.
    async fn add_swift_code(&self, request: NewSwiftCode) -> Result<SwiftCodeRecord>;

    async fn delete_swift_code(&self, raw_code: &str) -> Result<()>;
}

// ── SwiftCodeServiceImpl ──────────────────────────────────────

pub struct SwiftCodeServiceImpl {
    store: Arc<dyn SwiftCodeStore>,
}

impl SwiftCodeServiceImpl {
    pub fn new(store: Arc<dyn SwiftCodeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SwiftCodeService for SwiftCodeServiceImpl {
    async fn get_swift_code(&self, raw_code: &str) -> Result<SwiftCodeDetail> {
        let code = normalize_code(raw_code);
        debug!(swift_code = %code, "lookup");

        let record = self
            .store
            .find_by_code(&code)
            .await?
            .ok_or_else(|| SwiftError::NotFound(format!("SWIFT code {code}")))?;

        hierarchy::resolve_detail(self.store.as_ref(), record).await
    }

    async fn get_country(&self, raw_iso2: &str) -> Result<CountrySwiftCodes> {
        let (iso2, _) = normalize_country(raw_iso2, "");
        debug!(country = %iso2, "country lookup");

        let records = self.store.find_by_country(&iso2).await?;
        // Records for one country are assumed to share a name; the first wins.
        let country_name = records
            .first()
            .map(|r| r.country_name.clone())
            .ok_or_else(|| SwiftError::NotFound(format!("Country {iso2}")))?;

        Ok(CountrySwiftCodes {
            country_iso2: iso2,
            country_name,
            swift_codes: records.iter().map(SwiftCodeRecord::summary).collect(),
        })
    }

    async fn add_swift_code(&self, request: NewSwiftCode) -> Result<SwiftCodeRecord> {
        let record = request.validate().inspect_err(|e| {
            warn!(error = %e, "rejected create request");
        })?;

        if record.is_headquarter {
            let prefix = institution_prefix(&record.swift_code);
            // A prefix scan on a short code also hits longer codes that merely
            // start with it; only an equal institution prefix is a conflict.
            let existing = self
                .store
                .find_by_prefix(prefix, Some(&record.swift_code), Some(true))
                .await?;
            if let Some(other) = existing
                .iter()
                .find(|other| institution_prefix(&other.swift_code) == prefix)
            {
                return Err(SwiftError::DuplicateKey(format!(
                    "institution {prefix} already has headquarters {}",
                    other.swift_code
                )));
            }
        }

        self.store.insert_unique(&record).await?;
        info!(swift_code = %record.swift_code, "SWIFT code added");
        Ok(record)
    }

    async fn delete_swift_code(&self, raw_code: &str) -> Result<()> {
        let code = normalize_code(raw_code);
        match self.store.delete_by_code(&code).await? {
            0 => Err(SwiftError::NotFound(format!("SWIFT code {code}"))),
            _ => {
                info!(swift_code = %code, "SWIFT code deleted");
                Ok(())
            }
        }
    }
}
