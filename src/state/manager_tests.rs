//! Tests for StateManager

use super::*;
use tempfile::tempdir;

fn watermark(value: &str) -> Watermark {
    Watermark {
        cursor_field: "startTime".to_string(),
        value: value.to_string(),
    }
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"streams": {"keywords_report": {"cursor_field": "startTime", "cursor": "2022-01-02"}}}"#,
    )
    .unwrap();

    assert!(manager.is_in_memory());
    assert_eq!(
        manager.get_cursor("keywords_report").await,
        Some("2022-01-02".to_string())
    );
}

#[tokio::test]
async fn test_from_json_empty_and_invalid() {
    let manager = StateManager::from_json("  ").unwrap();
    assert!(manager.snapshot().await.streams.is_empty());

    let err = StateManager::from_json("not json").unwrap_err();
    assert!(matches!(err, crate::Error::State { .. }));
}

// ============================================================================
// Watermark Tests
// ============================================================================

#[tokio::test]
async fn test_get_set_watermark() {
    let manager = StateManager::in_memory();
    assert!(manager.watermark("keywords_report").await.is_none());

    manager
        .set_watermark("keywords_report", watermark("2022-01-02"))
        .await
        .unwrap();

    assert_eq!(
        manager.watermark("keywords_report").await,
        Some(watermark("2022-01-02"))
    );
    assert!(manager.watermark("campaigns_report").await.is_none());
}

#[tokio::test]
async fn test_clones_share_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();

    clone
        .set_watermark("s", watermark("2022-01-09"))
        .await
        .unwrap();

    assert_eq!(manager.get_cursor("s").await, Some("2022-01-09".to_string()));
}

// ============================================================================
// File Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_watermark_commit_writes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::from_file(&path).unwrap();
    assert!(!path.exists());

    manager
        .set_watermark("keywords_report", watermark("2022-01-02"))
        .await
        .unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("state.tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_cursor("keywords_report").await,
        Some("2022-01-02".to_string())
    );
}

#[tokio::test]
async fn test_file_contents_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    manager
        .set_watermark("campaigns_report", watermark("2022-03-01"))
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        json["streams"]["campaigns_report"]["cursor"],
        "2022-03-01"
    );
    assert_eq!(
        json["streams"]["campaigns_report"]["cursor_field"],
        "startTime"
    );
}

#[tokio::test]
async fn test_from_file_invalid_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{broken").unwrap();

    let err = StateManager::from_file(&path).unwrap_err();
    assert!(matches!(err, crate::Error::State { .. }));
}

#[tokio::test]
async fn test_save_to_file_from_memory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("exported.json");

    let manager = StateManager::from_json(r#"{"streams": {"s": {"cursor": "2022-01-01"}}}"#).unwrap();
    manager.save().await.unwrap();
    assert!(!path.exists());

    manager.save_to_file(&path).await.unwrap();
    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(reloaded.get_cursor("s").await, Some("2022-01-01".to_string()));
}
