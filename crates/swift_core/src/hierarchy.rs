//! Headquarters → branch resolution.
//!
//! The relationship is never stored. A branch belongs to a headquarters
//! when it shares the headquarters' institution prefix, is not itself a
//! headquarters, and is not the headquarters' own code. Resolution is one
//! level deep: branches are non-headquarters by construction and are never
//! expanded.

use tracing::debug;

use crate::normalize::institution_prefix;
use crate::ports::{Result, SwiftCodeStore};
use crate::types::{BranchSummary, SwiftCodeDetail, SwiftCodeRecord};

/// Branches of a headquarters record, ordered by code.
pub async fn find_branches(
    store: &dyn SwiftCodeStore,
    headquarter: &SwiftCodeRecord,
) -> Result<Vec<BranchSummary>> {
    let prefix = institution_prefix(&headquarter.swift_code);
    let branches = store
        .find_by_prefix(prefix, Some(&headquarter.swift_code), Some(false))
        .await?;
    debug!(
        swift_code = %headquarter.swift_code,
        prefix,
        branches = branches.len(),
        "resolved branches"
    );
    Ok(branches.iter().map(SwiftCodeRecord::summary).collect())
}

/// Shape the detail payload for a found record. Headquarters carry their
/// branch list; branches carry none.
pub async fn resolve_detail(
    store: &dyn SwiftCodeStore,
    record: SwiftCodeRecord,
) -> Result<SwiftCodeDetail> {
    let branches = if record.is_headquarter {
        Some(find_branches(store, &record).await?)
    } else {
        None
    };
    Ok(SwiftCodeDetail { record, branches })
}
