//! Bulk loader for the catalog.
//!
//! Reads a CSV source in full, maps recognized columns onto record fields,
//! normalizes every row, and replaces the store's contents in one call.
//! Nothing is written until the whole source has parsed, so a read error
//! leaves the existing catalog untouched.
//!
//! Recognized headers (case-insensitive, first non-empty alias wins):
//!
//! | field        | aliases                        |
//! |--------------|--------------------------------|
//! | swiftCode    | `SWIFT`, `swift_code`          |
//! | bankName     | `BANK_NAME`, `bank_name`       |
//! | address      | `ADDRESS`, `address`           |
//! | countryISO2  | `COUNTRY_ISO`, `country_iso`   |
//! | countryName  | `COUNTRY_NAME`, `country_name` |
//!
//! `isHeadquarter` is always derived from the code suffix. Missing columns
//! and missing cells read as empty strings. Rows without a code, repeated
//! codes, and a second headquarters for an institution already seen are
//! skipped and counted; the first occurrence is kept.
//!
//! The replace is only as atomic as the store's `replace_all`. Run ingestion
//! offline, not against a store serving live traffic through a backend that
//! cannot swap atomically.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

use crate::normalize::institution_prefix;
use crate::ports::{Result, SwiftCodeStore};
use crate::types::SwiftCodeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    SwiftCode,
    BankName,
    Address,
    CountryIso2,
    CountryName,
}

const COLUMN_ALIASES: [(Field, [&str; 2]); 5] = [
    (Field::SwiftCode, ["SWIFT", "swift_code"]),
    (Field::BankName, ["BANK_NAME", "bank_name"]),
    (Field::Address, ["ADDRESS", "address"]),
    (Field::CountryIso2, ["COUNTRY_ISO", "country_iso"]),
    (Field::CountryName, ["COUNTRY_NAME", "country_name"]),
];

/// Column positions for each field, in alias precedence order.
struct ColumnMap {
    positions: Vec<(Field, Vec<usize>)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let positions = COLUMN_ALIASES
            .iter()
            .map(|(field, aliases)| {
                let mut idxs = Vec::new();
                for alias in aliases {
                    for (idx, header) in headers.iter().enumerate() {
                        if header.trim().eq_ignore_ascii_case(alias) && !idxs.contains(&idx) {
                            idxs.push(idx);
                        }
                    }
                }
                (*field, idxs)
            })
            .collect();
        Self { positions }
    }

    fn get<'r>(&self, row: &'r csv::StringRecord, field: Field) -> &'r str {
        self.positions
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, idxs)| {
                idxs.iter()
                    .filter_map(|idx| row.get(*idx))
                    .find(|v| !v.trim().is_empty())
            })
            .unwrap_or("")
    }

    fn record(&self, row: &csv::StringRecord) -> SwiftCodeRecord {
        SwiftCodeRecord::from_raw(
            self.get(row, Field::SwiftCode),
            self.get(row, Field::BankName),
            self.get(row, Field::Address),
            self.get(row, Field::CountryIso2),
            self.get(row, Field::CountryName),
        )
    }
}

/// A fully parsed source, ready to replace the store's contents.
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub records: Vec<SwiftCodeRecord>,
    pub rows_read: usize,
    /// Rows dropped for an empty code, a code already seen earlier, or a
    /// second headquarters for one institution.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub inserted: u64,
    pub skipped: usize,
}

/// Parse every row of a CSV source.
///
/// Rows without a code cannot be keyed and are skipped. A repeated code,
/// or a headquarters for an institution that already has one, keeps the
/// first occurrence.
pub fn parse_records<R: Read>(reader: R) -> anyhow::Result<ParsedSource> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV headers")?.clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut parsed = ParsedSource::default();
    let mut seen = HashSet::new();
    let mut headquarters = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        parsed.rows_read += 1;

        let record = columns.record(&row);
        if record.swift_code.is_empty() {
            warn!(row = idx + 1, "skipping row without SWIFT code");
            parsed.skipped += 1;
            continue;
        }
        if !seen.insert(record.swift_code.clone()) {
            warn!(row = idx + 1, swift_code = %record.swift_code, "skipping duplicate SWIFT code");
            parsed.skipped += 1;
            continue;
        }
        if record.is_headquarter
            && !headquarters.insert(institution_prefix(&record.swift_code).to_string())
        {
            warn!(
                row = idx + 1,
                swift_code = %record.swift_code,
                "skipping second headquarters for institution"
            );
            parsed.skipped += 1;
            continue;
        }
        parsed.records.push(record);
    }

    Ok(parsed)
}

pub fn parse_file(path: &Path) -> anyhow::Result<ParsedSource> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    parse_records(file).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Replace the store's contents with a parsed source. An empty source
/// clears the store and reports zero inserted.
pub async fn ingest(store: &dyn SwiftCodeStore, source: ParsedSource) -> Result<IngestReport> {
    let ParsedSource {
        records,
        rows_read,
        skipped,
    } = source;

    if records.is_empty() {
        info!("No data found to import; clearing catalog");
    }
    let inserted = store.replace_all(records).await?;

    let report = IngestReport {
        rows_read,
        inserted,
        skipped,
    };
    info!(
        rows_read = report.rows_read,
        inserted = report.inserted,
        skipped = report.skipped,
        "Imported SWIFT code records"
    );
    Ok(report)
}

/// Parse `path` in full, then replace the store's contents.
pub async fn ingest_file(store: &dyn SwiftCodeStore, path: &Path) -> anyhow::Result<IngestReport> {
    let source = parse_file(path)?;
    Ok(ingest(store, source).await?)
}
