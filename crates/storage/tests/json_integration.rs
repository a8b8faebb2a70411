use std::fs;

use culturo_core::model::{Activity, ProgressRecord, Region, StarCount};
use storage::json::JsonFileRepository;
use storage::repository::{ProgressRepository, Storage, StorageError};

fn sample_record() -> ProgressRecord {
    let mut record = ProgressRecord::default();
    record.set_stars(
        Region::new("China"),
        Activity::new("Food"),
        StarCount::clamped(2),
    );
    record.set_stars(
        Region::new("Vietnam"),
        Activity::new("Performance"),
        StarCount::MAX,
    );
    record
}

#[tokio::test]
async fn json_roundtrip_survives_fresh_repository() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("stars.json");

    let writer = JsonFileRepository::open(&path).expect("open");
    let record = sample_record();
    writer.save_progress(&record).await.expect("save");

    let reader = JsonFileRepository::open(&path).expect("reopen");
    let loaded = reader.load_progress().await.expect("load");
    assert_eq!(loaded, Some(record));
}

#[tokio::test]
async fn json_document_uses_nested_region_activity_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stars.json");
    let repo = JsonFileRepository::open(&path).expect("open");
    repo.save_progress(&ProgressRecord::default())
        .await
        .expect("save");

    let raw = fs::read_to_string(&path).expect("read");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse");
    let regions = value.as_object().expect("object");
    assert_eq!(regions.len(), 3);
    for region in ["Hong Kong", "China", "Vietnam"] {
        let activities = regions[region].as_object().expect("activities");
        assert_eq!(activities.len(), 4);
        for activity in ["Language", "Draw Animals", "Food", "Performance"] {
            assert_eq!(activities[activity], 0);
        }
    }
    // pretty-printed with two-space indentation
    assert!(raw.contains("\n  \"China\": {"));
}

#[tokio::test]
async fn json_missing_file_loads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = JsonFileRepository::open(dir.path().join("stars.json")).expect("open");
    assert!(repo.load_progress().await.expect("load").is_none());
}

#[tokio::test]
async fn json_corrupt_file_reports_serialization_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stars.json");
    fs::write(&path, "{\"China\": {\"Food\": \"lots\"}}").expect("write");

    let repo = JsonFileRepository::open(&path).expect("open");
    let err = repo.load_progress().await.expect_err("corrupt");
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn json_load_clamps_and_fills_hand_edited_documents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stars.json");
    fs::write(&path, r#"{"Hong Kong": {"Language": 9, "Food": -2}}"#).expect("write");

    let repo = JsonFileRepository::open(&path).expect("open");
    let record = repo.load_progress().await.expect("load").expect("document");
    let hk = record.region("Hong Kong").expect("region");
    assert_eq!(hk.get("Language"), StarCount::MAX);
    assert_eq!(hk.get("Food"), StarCount::ZERO);
    assert_eq!(hk.len(), 4);
}

#[tokio::test]
async fn json_load_keeps_documents_with_float_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stars.json");
    fs::write(
        &path,
        r#"{"China": {"Food": 2.0, "Language": 3}, "Vietnam": {"Performance": 1}}"#,
    )
    .expect("write");

    let repo = JsonFileRepository::open(&path).expect("open");
    let record = repo.load_progress().await.expect("load").expect("document");
    assert_eq!(record.total_for("China"), 5);
    assert_eq!(record.total_for("Vietnam"), 1);
}

#[tokio::test]
async fn json_clear_deletes_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stars.json");
    let storage = Storage::json_file(&path).expect("storage");

    storage
        .progress
        .save_progress(&sample_record())
        .await
        .expect("save");
    assert!(path.exists());

    storage.progress.clear_progress().await.expect("clear");
    assert!(!path.exists());
    storage.progress.clear_progress().await.expect("clear again");
}
