//! Behavioral tests for the JSON dataset store.

use chrono::{DateTime, TimeZone, Utc};
use starcast::{
    CollectedDataset, DatasetStore, JsonDatasetStore, RepoIdentity, StarEvent, StatSnapshot,
    TimeSeries,
};

fn dataset(identity: &RepoIdentity, collected_at: DateTime<Utc>, events: u64) -> CollectedDataset {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let events: Vec<StarEvent> = (0..events)
        .map(|i| StarEvent::new(start + chrono::Duration::days(i as i64), i + 1))
        .collect();
    let snapshot = StatSnapshot {
        full_name: identity.full_name(),
        stars: events.len() as u64,
        forks: 2,
        watchers: events.len() as u64,
        open_issues: 1,
        language: Some("Rust".to_string()),
        description: Some("test".to_string()),
        created_at: start,
        updated_at: collected_at,
        collected_at,
    };
    CollectedDataset::build(identity.clone(), snapshot, &TimeSeries::from_events(&events))
}

#[tokio::test]
async fn persisted_document_roundtrips_through_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonDatasetStore::new(dir.path()).unwrap();
    let identity = RepoIdentity::new("octo", "roundtrip");

    let original = dataset(&identity, Utc::now(), 7);
    store.persist(&original).await.unwrap();

    let loaded = store.load_latest(&identity).await.unwrap();
    assert_eq!(loaded, original);
}

#[tokio::test]
async fn latest_wins_is_decided_by_collected_at_not_write_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonDatasetStore::new(dir.path()).unwrap();
    let identity = RepoIdentity::new("octo", "ordering");

    let older = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2026, 6, 5, 0, 0, 0).unwrap();

    // Write the newer collection first; the embedded timestamp must still win.
    store.persist(&dataset(&identity, newer, 20)).await.unwrap();
    store.persist(&dataset(&identity, older, 10)).await.unwrap();

    let latest = store.load_latest(&identity).await.unwrap();
    assert_eq!(latest.stats.collected_at, newer);
    assert_eq!(latest.star_history.len(), 20);
}

#[tokio::test]
async fn unreadable_documents_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonDatasetStore::new(dir.path()).unwrap();
    let identity = RepoIdentity::new("octo", "corrupt");

    let good = dataset(&identity, Utc::now(), 3);
    store.persist(&good).await.unwrap();
    std::fs::write(
        dir.path().join(format!("{}_garbage.json", identity.slug())),
        b"not json at all",
    )
    .unwrap();

    let loaded = store.load_latest(&identity).await.unwrap();
    assert_eq!(loaded, good);
}

#[tokio::test]
async fn file_names_carry_slug_and_collection_date() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonDatasetStore::new(dir.path()).unwrap();
    let identity = RepoIdentity::new("rust-lang", "rust");
    let when = Utc.with_ymd_and_hms(2026, 7, 4, 9, 30, 0).unwrap();

    let path = store.persist(&dataset(&identity, when, 1)).await.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "rust-lang_rust_20260704.json"
    );
}
