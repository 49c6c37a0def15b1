//! Integration tests for PgSwiftCodeStore.
//!
//! Requires a running PostgreSQL database. The tests share the
//! `swift_codes` table, so run them single-threaded:
//! DATABASE_URL="postgresql:///swift_codes_test" cargo test -p swift_postgres --test pg_store_integration -- --ignored --test-threads=1

use swift_core::error::SwiftError;
use swift_core::ports::SwiftCodeStore;
use swift_core::types::SwiftCodeRecord;
use swift_postgres::{open_store, DatabaseConfig, PgSwiftCodeStore};

async fn test_store() -> PgSwiftCodeStore {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let config = DatabaseConfig::new(database_url).with_max_connections(2);
    let store = open_store(&config)
        .await
        .expect("failed to open test store");
    store.replace_all(Vec::new()).await.expect("failed to reset");
    store
}

fn rec(code: &str, country: &str) -> SwiftCodeRecord {
    SwiftCodeRecord::from_raw(code, "Bank", "Addr", country, "NAME")
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn insert_find_delete() {
    let store = test_store().await;
    store.insert_unique(&rec("AAAABBCCXXX", "PL")).await.unwrap();

    let found = store.find_by_code("AAAABBCCXXX").await.unwrap().unwrap();
    assert!(found.is_headquarter);

    assert_eq!(store.delete_by_code("AAAABBCCXXX").await.unwrap(), 1);
    assert_eq!(store.delete_by_code("AAAABBCCXXX").await.unwrap(), 0);
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn duplicate_insert_is_duplicate_key() {
    let store = test_store().await;
    store.insert_unique(&rec("AAAABBCC001", "PL")).await.unwrap();
    let err = store
        .insert_unique(&rec("AAAABBCC001", "DE"))
        .await
        .unwrap_err();
    assert!(matches!(err, SwiftError::DuplicateKey(_)));

    let kept = store.find_by_code("AAAABBCC001").await.unwrap().unwrap();
    assert_eq!(kept.country_iso2, "PL");
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn prefix_scan_is_literal_and_filtered() {
    let store = test_store().await;
    store
        .replace_all(vec![
            rec("AAAABBCCXXX", "PL"),
            rec("AAAABBCC111", "PL"),
            rec("AAAABBCC222", "PL"),
            rec("AAAA_BCC333", "PL"),
            rec("ZZZZYYCCXXX", "PL"),
        ])
        .await
        .unwrap();

    let branches = store
        .find_by_prefix("AAAABBCC", Some("AAAABBCCXXX"), Some(false))
        .await
        .unwrap();
    let codes: Vec<_> = branches.iter().map(|r| r.swift_code.as_str()).collect();
    assert_eq!(codes, vec!["AAAABBCC111", "AAAABBCC222"]);

    // `_` must not act as a wildcard.
    let literal = store.find_by_prefix("AAAA_", None, None).await.unwrap();
    assert_eq!(literal.len(), 1);
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn country_scan_is_ordered() {
    let store = test_store().await;
    store
        .replace_all(vec![rec("CCCCUSXXXXX", "US"), rec("AAAAUSXXXXX", "US"), rec("BBBBPLXXXXX", "PL")])
        .await
        .unwrap();
    let codes: Vec<_> = store
        .find_by_country("US")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.swift_code)
        .collect();
    assert_eq!(codes, vec!["AAAAUSXXXXX", "CCCCUSXXXXX"]);
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn failed_replace_rolls_back() {
    let store = test_store().await;
    store.replace_all(vec![rec("OLDOLDOLXXX", "PL")]).await.unwrap();

    let err = store
        .replace_all(vec![rec("DUPDUPDUXXX", "DE"), rec("DUPDUPDUXXX", "DE")])
        .await
        .unwrap_err();
    assert!(matches!(err, SwiftError::DuplicateKey(_)));
    assert!(store.find_by_code("OLDOLDOLXXX").await.unwrap().is_some());
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn second_headquarters_for_institution_is_duplicate_key() {
    let store = test_store().await;
    store.insert_unique(&rec("AAAABBCCXXX", "PL")).await.unwrap();

    let err = store
        .insert_unique(&rec("AAAABBCCZXXX", "PL"))
        .await
        .unwrap_err();
    assert!(matches!(err, SwiftError::DuplicateKey(_)));
    assert!(store.find_by_code("AAAABBCCZXXX").await.unwrap().is_none());

    // Branches and a short headquarters with its own prefix are unaffected.
    store.insert_unique(&rec("AAAABBCC001", "PL")).await.unwrap();
    store.insert_unique(&rec("AAAABB", "PL")).await.unwrap();
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn replace_with_two_headquarters_for_institution_rolls_back() {
    let store = test_store().await;
    store.replace_all(vec![rec("OLDOLDOLXXX", "PL")]).await.unwrap();

    let err = store
        .replace_all(vec![rec("AAAABBCCXXX", "PL"), rec("AAAABBCCZXXX", "PL")])
        .await
        .unwrap_err();
    assert!(matches!(err, SwiftError::DuplicateKey(_)));
    assert!(store.find_by_code("OLDOLDOLXXX").await.unwrap().is_some());
}
