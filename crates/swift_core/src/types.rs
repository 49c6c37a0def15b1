//! Record and payload types for the SWIFT code catalog.
//!
//! JSON field names follow the public API (`swiftCode`, `countryISO2`, ...).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwiftError};
use crate::normalize::{derive_is_headquarter, normalize_code, normalize_country, normalize_text};

// ── Stored record ─────────────────────────────────────────────

/// A single catalog entry. Always held in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftCodeRecord {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
}

impl SwiftCodeRecord {
    /// Build a canonical record from raw field values, deriving the
    /// headquarters flag from the normalized code.
    pub fn from_raw(
        swift_code: &str,
        bank_name: &str,
        address: &str,
        country_iso2: &str,
        country_name: &str,
    ) -> Self {
        let swift_code = normalize_code(swift_code);
        let (country_iso2, country_name) = normalize_country(country_iso2, country_name);
        Self {
            is_headquarter: derive_is_headquarter(&swift_code),
            swift_code,
            bank_name: normalize_text(bank_name),
            address: normalize_text(address),
            country_iso2,
            country_name,
        }
    }

    pub fn summary(&self) -> BranchSummary {
        BranchSummary {
            swift_code: self.swift_code.clone(),
            bank_name: self.bank_name.clone(),
            address: self.address.clone(),
            country_iso2: self.country_iso2.clone(),
            is_headquarter: self.is_headquarter,
        }
    }
}

// ── Response payloads ─────────────────────────────────────────

/// Record fields without the country name. Used for branch lists and
/// country listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub is_headquarter: bool,
}

/// Detail payload for `GET /{code}`. `branches` is present (possibly empty)
/// only for headquarters records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftCodeDetail {
    #[serde(flatten)]
    pub record: SwiftCodeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<BranchSummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySwiftCodes {
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub swift_codes: Vec<BranchSummary>,
}

// ── Create request ────────────────────────────────────────────

/// Body of a create request. Every field is optional so that presence can
/// be checked field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSwiftCode {
    pub swift_code: Option<String>,
    pub bank_name: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "countryISO2")]
    pub country_iso2: Option<String>,
    pub country_name: Option<String>,
    pub is_headquarter: Option<bool>,
}

impl NewSwiftCode {
    /// Check presence of all six fields and produce a canonical record.
    ///
    /// Blank strings count as absent; `isHeadquarter: false` counts as
    /// present. The flag must agree with the code suffix.
    pub fn validate(self) -> Result<SwiftCodeRecord> {
        let swift_code = required("swiftCode", self.swift_code)?;
        let bank_name = required("bankName", self.bank_name)?;
        let address = required("address", self.address)?;
        let country_iso2 = required("countryISO2", self.country_iso2)?;
        let country_name = required("countryName", self.country_name)?;
        let claimed = self
            .is_headquarter
            .ok_or_else(|| missing_field("isHeadquarter"))?;

        let record =
            SwiftCodeRecord::from_raw(&swift_code, &bank_name, &address, &country_iso2, &country_name);

        if claimed != record.is_headquarter {
            return Err(SwiftError::Validation(format!(
                "isHeadquarter must be {} for SWIFT code {}",
                record.is_headquarter, record.swift_code
            )));
        }
        Ok(record)
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing_field(field))
}

fn missing_field(field: &str) -> SwiftError {
    SwiftError::Validation(format!("Missing required field: {field}"))
}
