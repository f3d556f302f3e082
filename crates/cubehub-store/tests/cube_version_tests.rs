mod common;

use common::{cards, cube, setup_store};
use cubehub_core::errors::ExErrorKind;
use cubehub_core::storage::CubeStorage;

#[test]
fn test_update_then_get_round_trips_counts() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a", "b"])).unwrap();
    let committed = cube("c1", 0, cards(&["a", "a", "b"]));

    store.update_cube(&committed).unwrap();
    let loaded = store.get_cube("c1", None).unwrap().unwrap();

    assert_eq!(loaded.version_number, 0);
    assert_eq!(loaded.name, "Cube c1");
    assert_eq!(loaded.date, committed.date);
    assert_eq!(loaded.card_counts(), committed.card_counts());
    assert_eq!(loaded.cards.len(), 3);
}

#[test]
fn test_latest_and_explicit_versions() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a", "b", "c"])).unwrap();
    store.update_cube(&cube("c1", 0, cards(&["a", "b"]))).unwrap();
    store.update_cube(&cube("c1", 1, cards(&["a", "c"]))).unwrap();

    let latest = store.get_cube("c1", None).unwrap().unwrap();
    assert_eq!(latest.version_number, 1);
    assert!(latest.card_ids().contains("c"));

    let first = store.get_cube("c1", Some(0)).unwrap().unwrap();
    assert_eq!(first.version_number, 0);
    assert!(first.card_ids().contains("b"));
}

#[test]
fn test_unknown_cube_or_version_is_none() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a"])).unwrap();
    store.update_cube(&cube("c1", 0, cards(&["a"]))).unwrap();

    assert!(store.get_cube("missing", None).unwrap().is_none());
    assert!(store.get_cube("c1", Some(7)).unwrap().is_none());
}

#[test]
fn test_skipping_a_version_is_head_mismatch_and_writes_nothing() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a", "b"])).unwrap();
    store.update_cube(&cube("c1", 0, cards(&["a"]))).unwrap();

    let err = store
        .update_cube(&cube("c1", 2, cards(&["a", "b"])))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HeadMismatch);
    assert_eq!(err.entity_id(), Some("c1"));
    let head = store.get_cube("c1", None).unwrap().unwrap();
    assert_eq!(head.version_number, 0);
    assert!(store.get_cube("c1", Some(2)).unwrap().is_none());
}

#[test]
fn test_recommitting_same_version_is_head_mismatch() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a"])).unwrap();
    store.update_cube(&cube("c1", 0, cards(&["a"]))).unwrap();

    let err = store.update_cube(&cube("c1", 0, cards(&["a"]))).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::HeadMismatch);
}

#[test]
fn test_new_cube_must_start_at_zero() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a"])).unwrap();

    let err = store.update_cube(&cube("c1", 1, cards(&["a"]))).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::HeadMismatch);
    assert!(store.get_cube("c1", None).unwrap().is_none());
}

#[test]
fn test_membership_of_unknown_card_rolls_back_version() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a"])).unwrap();

    let err = store
        .update_cube(&cube("c1", 0, cards(&["a", "never-upserted"])))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(store.get_cube("c1", None).unwrap().is_none());
}

#[test]
fn test_recommitting_loaded_cube_preserves_counts() {
    let (_dir, store) = setup_store();
    store.upsert_cards(&cards(&["a", "b"])).unwrap();
    store
        .update_cube(&cube("c1", 0, cards(&["a", "b", "b", "b"])))
        .unwrap();

    let mut next = store.get_cube("c1", None).unwrap().unwrap();
    next.version_number += 1;
    store.update_cube(&next).unwrap();

    let reloaded = store.get_cube("c1", Some(1)).unwrap().unwrap();
    assert_eq!(reloaded.card_counts().get("b"), Some(&3));
}
