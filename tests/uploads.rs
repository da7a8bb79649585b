use std::path::Path;

use marketplace_api::{
    config::AppConfig,
    error::AppError,
    services::file_service,
    state::AppState,
};

fn test_state(dir: &Path, max_image_bytes: usize) -> AppState {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: dir.join("data"),
        upload_dir: dir.join("uploads"),
        auction_hours: 24,
        max_image_bytes,
    };
    AppState::initialize(config).expect("state init")
}

#[tokio::test]
async fn upload_then_retrieve_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path(), 1024);

    let filename = file_service::save_upload(&state, Some("cat.PNG"), b"png-bytes")
        .await
        .expect("save upload");
    assert!(filename.ends_with(".png"));

    let (bytes, content_type) = file_service::open_image(&state, &filename)
        .await
        .expect("open image");
    assert_eq!(bytes, b"png-bytes");
    assert_eq!(content_type, "image/png");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path(), 16);

    let err = file_service::save_upload(&state, Some("big.jpg"), &[0u8; 17])
        .await
        .expect_err("oversized upload must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    // Nothing may land in the upload directory on a rejected upload.
    let entries = std::fs::read_dir(dir.path().join("uploads")).expect("read dir");
    assert_eq!(entries.count(), 0);
}

#[tokio::test]
async fn traversal_names_are_rejected_before_filesystem_access() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path(), 1024);

    for name in ["../../etc/passwd", "a/../b.png", "up\\down.png", ""] {
        let err = file_service::open_image(&state, name)
            .await
            .expect_err("traversal must be rejected");
        assert!(matches!(err, AppError::BadRequest(_)), "name: {name:?}");
    }
}

#[tokio::test]
async fn missing_image_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path(), 1024);

    let err = file_service::open_image(&state, "nope.png")
        .await
        .expect_err("missing file must 404");
    assert!(matches!(err, AppError::NotFound));
}
