use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::error::SwiftError;
use crate::normalize::institution_prefix;
use crate::ports::{Result, SwiftCodeStore};
use crate::types::SwiftCodeRecord;

/// In-memory SwiftCodeStore for tests and database-less runs.
///
/// Records are keyed by code in a `BTreeMap`, so every listing comes back
/// in code order and prefix scans are range scans. `replace_all` builds
/// the new map first and swaps it under one write lock. Both mutations
/// check code uniqueness and one headquarters per institution prefix while
/// holding the lock.
pub struct MemorySwiftCodeStore {
    inner: RwLock<BTreeMap<String, SwiftCodeRecord>>,
}

impl MemorySwiftCodeStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = SwiftCodeRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.swift_code.clone(), r))
            .collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    pub fn len(&self) -> Result<usize> {
        let store = self.inner.read().map_err(lock_err)?;
        Ok(store.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemorySwiftCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_err(e: impl std::fmt::Display) -> SwiftError {
    SwiftError::StoreUnavailable(anyhow!("Lock: {}", e))
}

/// Reject `record` if it repeats a code, or is a headquarters for an
/// institution that already has one.
fn check_unique(
    map: &BTreeMap<String, SwiftCodeRecord>,
    record: &SwiftCodeRecord,
) -> Result<()> {
    if map.contains_key(&record.swift_code) {
        return Err(SwiftError::DuplicateKey(record.swift_code.clone()));
    }
    if record.is_headquarter {
        let prefix = institution_prefix(&record.swift_code);
        let existing = map
            .range(prefix.to_string()..)
            .take_while(|(code, _)| code.starts_with(prefix))
            .map(|(_, r)| r)
            .find(|r| r.is_headquarter && institution_prefix(&r.swift_code) == prefix);
        if let Some(other) = existing {
            return Err(SwiftError::DuplicateKey(format!(
                "institution {prefix} already has headquarters {}",
                other.swift_code
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl SwiftCodeStore for MemorySwiftCodeStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<SwiftCodeRecord>> {
        let store = self.inner.read().map_err(lock_err)?;
        Ok(store.get(code).cloned())
    }

    async fn find_by_country(&self, iso2: &str) -> Result<Vec<SwiftCodeRecord>> {
        let store = self.inner.read().map_err(lock_err)?;
        Ok(store
            .values()
            .filter(|r| r.country_iso2 == iso2)
            .cloned()
            .collect())
    }

    async fn find_by_prefix(
        &self,
        prefix: &str,
        exclude_code: Option<&str>,
        is_headquarter: Option<bool>,
    ) -> Result<Vec<SwiftCodeRecord>> {
        let store = self.inner.read().map_err(lock_err)?;
        Ok(store
            .range(prefix.to_string()..)
            .take_while(|(code, _)| code.starts_with(prefix))
            .map(|(_, r)| r)
            .filter(|r| exclude_code != Some(r.swift_code.as_str()))
            .filter(|r| is_headquarter.map_or(true, |hq| r.is_headquarter == hq))
            .cloned()
            .collect())
    }

    async fn insert_unique(&self, record: &SwiftCodeRecord) -> Result<()> {
        let mut store = self.inner.write().map_err(lock_err)?;
        check_unique(&store, record)?;
        store.insert(record.swift_code.clone(), record.clone());
        Ok(())
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64> {
        let mut store = self.inner.write().map_err(lock_err)?;
        Ok(u64::from(store.remove(code).is_some()))
    }

    async fn replace_all(&self, records: Vec<SwiftCodeRecord>) -> Result<u64> {
        let mut staged = BTreeMap::new();
        for record in records {
            check_unique(&staged, &record)?;
            staged.insert(record.swift_code.clone(), record);
        }
        let count = staged.len() as u64;

        let mut store = self.inner.write().map_err(lock_err)?;
        *store = staged;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, country: &str) -> SwiftCodeRecord {
        SwiftCodeRecord::from_raw(code, "Bank", "Addr", country, "NAME")
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = MemorySwiftCodeStore::new();
        store.insert_unique(&rec("AAAABBCCXXX", "PL")).await.unwrap();
        let found = store.find_by_code("AAAABBCCXXX").await.unwrap().unwrap();
        assert_eq!(found.swift_code, "AAAABBCCXXX");
        assert!(store.find_by_code("ZZZZZZZZXXX").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_leaves_store_unchanged() {
        let store = MemorySwiftCodeStore::new();
        store.insert_unique(&rec("AAAABBCCXXX", "PL")).await.unwrap();

        let mut other = rec("AAAABBCCXXX", "DE");
        other.bank_name = "Other".into();
        let err = store.insert_unique(&other).await.unwrap_err();
        assert!(matches!(err, SwiftError::DuplicateKey(ref c) if c == "AAAABBCCXXX"));

        let kept = store.find_by_code("AAAABBCCXXX").await.unwrap().unwrap();
        assert_eq!(kept.country_iso2, "PL");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_missing_reports_zero() {
        let store = MemorySwiftCodeStore::with_records([rec("AAAABBCCXXX", "PL")]);
        assert_eq!(store.delete_by_code("NOPE").await.unwrap(), 0);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.delete_by_code("AAAABBCCXXX").await.unwrap(), 1);
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn find_by_country_is_exact_and_ordered() {
        let store = MemorySwiftCodeStore::with_records([
            rec("CCCCUSXXXXX", "US"),
            rec("AAAAUSXXXXX", "US"),
            rec("BBBBPLXXXXX", "PL"),
        ]);
        let us: Vec<_> = store
            .find_by_country("US")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.swift_code)
            .collect();
        assert_eq!(us, vec!["AAAAUSXXXXX", "CCCCUSXXXXX"]);
        assert!(store.find_by_country("us").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_by_prefix_applies_filters() {
        let store = MemorySwiftCodeStore::with_records([
            rec("AAAABBCCXXX", "PL"),
            rec("AAAABBCC111", "PL"),
            rec("AAAABBCC222", "PL"),
            rec("AAAABBCDXXX", "PL"),
        ]);
        let all = store.find_by_prefix("AAAABBCC", None, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let branches = store
            .find_by_prefix("AAAABBCC", Some("AAAABBCCXXX"), Some(false))
            .await
            .unwrap();
        let codes: Vec<_> = branches.iter().map(|r| r.swift_code.as_str()).collect();
        assert_eq!(codes, vec!["AAAABBCC111", "AAAABBCC222"]);

        let hqs = store
            .find_by_prefix("AAAABBCC", None, Some(true))
            .await
            .unwrap();
        assert_eq!(hqs.len(), 1);
    }

    #[tokio::test]
    async fn replace_all_swaps_contents() {
        let store = MemorySwiftCodeStore::with_records([rec("OLDOLDOLXXX", "PL")]);
        let n = store
            .replace_all(vec![rec("NEWNEWNEXXX", "DE"), rec("NEWNEWNE001", "DE")])
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert!(store.find_by_code("OLDOLDOLXXX").await.unwrap().is_none());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn replace_all_with_nothing_clears() {
        let store = MemorySwiftCodeStore::with_records([rec("OLDOLDOLXXX", "PL")]);
        assert_eq!(store.replace_all(Vec::new()).await.unwrap(), 0);
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn replace_all_rejects_duplicates_and_keeps_old_contents() {
        let store = MemorySwiftCodeStore::with_records([rec("OLDOLDOLXXX", "PL")]);
        let err = store
            .replace_all(vec![rec("DUPDUPDUXXX", "DE"), rec("DUPDUPDUXXX", "DE")])
            .await
            .unwrap_err();
        assert!(matches!(err, SwiftError::DuplicateKey(_)));
        assert!(store.find_by_code("OLDOLDOLXXX").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_headquarter_for_institution_is_rejected() {
        let store = MemorySwiftCodeStore::new();
        store.insert_unique(&rec("AAAABBCCXXX", "PL")).await.unwrap();

        let err = store
            .insert_unique(&rec("AAAABBCCZXXX", "PL"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwiftError::DuplicateKey(ref m) if m.contains("AAAABBCCXXX")));
        assert_eq!(store.len().unwrap(), 1);

        // Branches and headquarters of other institutions still go in.
        store.insert_unique(&rec("AAAABBCC001", "PL")).await.unwrap();
        store.insert_unique(&rec("AAAABBCDXXX", "PL")).await.unwrap();
        assert_eq!(store.len().unwrap(), 3);
    }

    #[tokio::test]
    async fn short_headquarter_is_its_own_institution() {
        let store = MemorySwiftCodeStore::with_records([rec("ABCXXXYYXXX", "US")]);
        store.insert_unique(&rec("ABCXXX", "US")).await.unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn replace_all_rejects_two_headquarters_for_one_institution() {
        let store = MemorySwiftCodeStore::with_records([rec("OLDOLDOLXXX", "PL")]);
        let err = store
            .replace_all(vec![rec("AAAABBCCXXX", "PL"), rec("AAAABBCCZXXX", "PL")])
            .await
            .unwrap_err();
        assert!(matches!(err, SwiftError::DuplicateKey(_)));
        assert!(store.find_by_code("OLDOLDOLXXX").await.unwrap().is_some());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn poisoned_lock_is_store_unavailable() {
        let store = std::sync::Arc::new(MemorySwiftCodeStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(SwiftError::StoreUnavailable(_))));
        assert!(store.is_empty().is_err());
    }
}
