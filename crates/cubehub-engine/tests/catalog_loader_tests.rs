mod common;

use common::{scryfall, CountingStore, FakeCatalog};
use cubehub_core::errors::ExErrorKind;
use cubehub_core::loaders::CardLoader;
use cubehub_core::storage::CubeStorage;
use cubehub_engine::catalog::{CatalogCardLoader, BATCH_SIZE};

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("sf-{:03}", i)).collect()
}

#[test]
fn test_80_ids_are_requested_as_75_then_5() {
    let requested = ids(80);
    let refs: Vec<&str> = requested.iter().map(String::as_str).collect();
    let catalog = FakeCatalog::with_ids(&refs);
    let store = CountingStore::new();

    let report = CatalogCardLoader::new(&catalog, &store)
        .load_cards(&requested)
        .unwrap();

    assert_eq!(catalog.batch_sizes(), vec![BATCH_SIZE, 5]);
    assert_eq!(report.batch_sizes, vec![75, 5]);
    assert_eq!(report.loaded, 80);
    assert!(report.is_complete());
    assert_eq!(store.upsert_calls.get(), 1, "one upsert after all batches");
    assert_eq!(store.inner.card_count().unwrap(), 80);
}

#[test]
fn test_missing_id_is_reported_and_batch_continues() {
    let catalog = FakeCatalog::with_ids(&["a", "c"]);
    let store = CountingStore::new();
    let request: Vec<String> = ["a", "ghost", "c"].iter().map(|s| s.to_string()).collect();

    let report = CatalogCardLoader::new(&catalog, &store)
        .load_cards(&request)
        .unwrap();

    assert_eq!(report.missing, vec!["ghost".to_string()]);
    assert_eq!(report.loaded, 2);
    let stored = store.get_by_ids(&request).unwrap();
    let stored_ids: Vec<&str> = stored.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(stored_ids, vec!["a", "c"]);
}

#[test]
fn test_unconvertible_record_is_skipped() {
    let mut catalog = FakeCatalog::with_ids(&["good"]);
    let mut bad = scryfall("bad");
    bad.released_at = "someday".to_string();
    catalog.add(bad);
    let store = CountingStore::new();

    let report = CatalogCardLoader::new(&catalog, &store)
        .load_cards(&["good".to_string(), "bad".to_string()])
        .unwrap();

    assert_eq!(report.skipped, vec!["bad".to_string()]);
    assert!(report.missing.is_empty());
    assert_eq!(store.inner.card_count().unwrap(), 1);
}

#[test]
fn test_catalog_failure_writes_nothing() {
    let catalog = FakeCatalog::with_ids(&["a"]);
    catalog.fail.set(true);
    let store = CountingStore::new();

    let err = CatalogCardLoader::new(&catalog, &store)
        .load_cards(&["a".to_string()])
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    assert_eq!(store.upsert_calls.get(), 0);
}

#[test]
fn test_no_ids_makes_no_requests() {
    let catalog = FakeCatalog::default();
    let store = CountingStore::new();

    let report = CatalogCardLoader::new(&catalog, &store)
        .load_cards(&[])
        .unwrap();

    assert!(catalog.requests.borrow().is_empty());
    assert_eq!(report.requested, 0);
}
