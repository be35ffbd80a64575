//! Grant store behavior against the in-memory backend.

use std::sync::Arc;

use granary::{Grant, GrantStoreError, PersistedGrantStore};
use granary_db_memory::InMemoryGrantCollection;
use time::{Duration, OffsetDateTime};

fn store_with_collection() -> (PersistedGrantStore, Arc<InMemoryGrantCollection>) {
    let collection = Arc::new(InMemoryGrantCollection::new());
    (PersistedGrantStore::new(collection.clone()), collection)
}

fn grant(key: &str, subject_id: Option<&str>, client_id: &str, grant_type: &str) -> Grant {
    Grant {
        key: key.to_string(),
        grant_type: grant_type.to_string(),
        subject_id: subject_id.map(str::to_string),
        client_id: client_id.to_string(),
        creation_time: OffsetDateTime::now_utc(),
        expiration: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
        data: r#"{"scopes":["openid"]}"#.to_string(),
    }
}

#[tokio::test]
async fn get_round_trips_every_stored_field() {
    let (store, _) = store_with_collection();
    let original = grant("g1", Some("u1"), "c1", Grant::REFRESH_TOKEN);

    store.store(&original).await.unwrap();
    let found = store.get("g1").await.unwrap().expect("grant should exist");

    assert_eq!(found, original);
}

#[tokio::test]
async fn get_missing_key_is_none_not_an_error() {
    let (store, _) = store_with_collection();
    assert!(store.get("absent").await.unwrap().is_none());
}

#[tokio::test]
async fn repeated_store_converges_to_single_record_with_latest_payload() {
    let (store, collection) = store_with_collection();

    let mut g = grant("g2", Some("u1"), "c1", Grant::REFRESH_TOKEN);
    g.data = "first".to_string();
    store.store(&g).await.unwrap();

    g.data = "second".to_string();
    g.expiration = Some(OffsetDateTime::now_utc() + Duration::hours(2));
    store.store(&g).await.unwrap();

    let found = store.get("g2").await.unwrap().unwrap();
    assert_eq!(found.data, "second");
    assert_eq!(found.expiration, g.expiration);
    assert_eq!(collection.len().await, 1);
}

#[tokio::test]
async fn empty_key_is_rejected_not_treated_as_wildcard() {
    let (store, collection) = store_with_collection();
    store
        .store(&grant("g1", Some("u1"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();

    let bad = grant("", Some("u1"), "c1", Grant::REFRESH_TOKEN);
    assert!(matches!(
        store.store(&bad).await,
        Err(GrantStoreError::EmptyKey)
    ));
    assert!(matches!(
        store.get("").await,
        Err(GrantStoreError::EmptyKey)
    ));
    assert!(matches!(
        store.remove("").await,
        Err(GrantStoreError::EmptyKey)
    ));

    // Nothing was matched or removed by the rejected calls.
    assert_eq!(collection.len().await, 1);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let (store, _) = store_with_collection();
    store
        .store(&grant("g1", Some("u1"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();

    store.remove("g1").await.unwrap();
    assert!(store.get("g1").await.unwrap().is_none());

    // Second removal of the same key is a no-op, never an error.
    store.remove("g1").await.unwrap();
    store.remove("never-existed").await.unwrap();
}

#[tokio::test]
async fn get_all_returns_only_the_subjects_grants() {
    let (store, _) = store_with_collection();
    store
        .store(&grant("g1", Some("u1"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();
    store
        .store(&grant("g2", Some("u1"), "c2", Grant::USER_CONSENT))
        .await
        .unwrap();
    store
        .store(&grant("g3", Some("u2"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();
    store
        .store(&grant("g4", None, "c1", Grant::REFERENCE_TOKEN))
        .await
        .unwrap();

    let mut keys: Vec<String> = store
        .get_all("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.key)
        .collect();
    keys.sort();

    assert_eq!(keys, vec!["g1", "g2"]);
    assert!(store.get_all("unknown").await.unwrap().is_empty());
}

#[tokio::test]
async fn remove_all_is_scoped_to_subject_and_client() {
    let (store, _) = store_with_collection();
    store
        .store(&grant("g1", Some("u1"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();
    store
        .store(&grant("g2", Some("u1"), "c1", Grant::USER_CONSENT))
        .await
        .unwrap();
    store
        .store(&grant("g3", Some("u1"), "c2", Grant::REFRESH_TOKEN))
        .await
        .unwrap();
    store
        .store(&grant("g4", Some("u2"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();

    store.remove_all("u1", "c1").await.unwrap();

    let remaining = store.get_all("u1").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|g| g.client_id != "c1"));

    // Other subjects are untouched.
    assert_eq!(store.get_all("u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn remove_all_of_type_spares_other_grant_kinds() {
    let (store, _) = store_with_collection();
    store
        .store(&grant("g1", Some("u1"), "c1", Grant::REFRESH_TOKEN))
        .await
        .unwrap();
    store
        .store(&grant("g2", Some("u1"), "c1", Grant::USER_CONSENT))
        .await
        .unwrap();

    store
        .remove_all_of_type("u1", "c1", Grant::REFRESH_TOKEN)
        .await
        .unwrap();

    assert!(store.get("g1").await.unwrap().is_none());
    let survivor = store.get("g2").await.unwrap().unwrap();
    assert_eq!(survivor.grant_type, Grant::USER_CONSENT);
}
