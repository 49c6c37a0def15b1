//! Canonical-form rules applied to every code record before it reaches a store.
//!
//! Both the create path and the ingestion pipeline go through these
//! functions, so a record's canonical form never depends on how it arrived.

/// Suffix that marks a headquarters code.
pub const HEADQUARTER_SUFFIX: &str = "XXX";

/// Number of leading characters shared by a headquarters and its branches.
pub const INSTITUTION_PREFIX_LEN: usize = 8;

/// Trim and uppercase a raw code. No length or charset validation.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn derive_is_headquarter(code: &str) -> bool {
    code.ends_with(HEADQUARTER_SUFFIX)
}

/// Trim and uppercase both country fields.
pub fn normalize_country(iso2: &str, name: &str) -> (String, String) {
    (iso2.trim().to_uppercase(), name.trim().to_uppercase())
}

/// Free-text fields (bank name, address) are trimmed only.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// First [`INSTITUTION_PREFIX_LEN`] characters of a code, or the whole code
/// when it is shorter. Slices on a char boundary.
pub fn institution_prefix(code: &str) -> &str {
    match code.char_indices().nth(INSTITUTION_PREFIX_LEN) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}
