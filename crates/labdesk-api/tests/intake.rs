use axum::body::Bytes;
use labdesk_api::intake::{public_url, stored_name, AllowedTypes, FileIntake, IntakeError, Upload};

fn upload(name: &str, content_type: Option<&str>, size: usize) -> Upload {
    Upload {
        filename: name.to_string(),
        content_type: content_type.map(str::to_string),
        bytes: Bytes::from(vec![7u8; size]),
    }
}

#[test]
fn stored_name_collapses_whitespace() {
    assert_eq!(
        stored_name(1_700_000_000_000, "my  rx\tscan 1.png"),
        "1700000000000-my_rx_scan_1.png"
    );
}

#[test]
fn stored_name_drops_directories() {
    assert_eq!(stored_name(5, "../../etc/passwd"), "5-passwd");
    assert_eq!(stored_name(5, "C:\\scans\\rx.jpg"), "5-rx.jpg");
    assert_eq!(stored_name(5, "dir/"), "5-upload");
    assert_eq!(stored_name(5, "..."), "5-upload");
}

#[test]
fn stored_name_drops_url_reserved_characters() {
    assert_eq!(stored_name(5, "rx#1.png"), "5-rx1.png");
    assert_eq!(stored_name(5, "scan?page=2&x=%20.jpg"), "5-scanpage2x20.jpg");
    assert_eq!(stored_name(5, "##"), "5-upload");
}

#[test]
fn images_only_matches_what_ocr_reads() {
    for mime in ["image/png", "image/jpeg", "image/gif", "image/webp"] {
        assert!(AllowedTypes::ImagesOnly.permits(mime), "{mime}");
    }
    for mime in ["image/heic", "image/tiff", "image/bmp", "application/pdf"] {
        assert!(!AllowedTypes::ImagesOnly.permits(mime), "{mime}");
    }
    assert!(AllowedTypes::Any.permits("image/heic"));
}

#[test]
fn public_url_joins_without_double_slash() {
    assert_eq!(
        public_url("http://lab.local/", "1-rx.png"),
        "http://lab.local/uploads/1-rx.png"
    );
    assert_eq!(public_url("", "1-rx.png"), "/uploads/1-rx.png");
}

#[test]
fn mime_falls_back_to_the_filename() {
    assert_eq!(upload("rx.jpg", None, 1).mime(), "image/jpeg");
    assert_eq!(
        upload("rx.png", Some("application/octet-stream"), 1).mime(),
        "image/png"
    );
    assert_eq!(upload("rx", Some("image/webp"), 1).mime(), "image/webp");
}

#[tokio::test]
async fn accept_writes_into_a_created_directory() {
    let root = tempfile::tempdir().unwrap();
    let intake = FileIntake::new(root.path().join("nested/uploads"), 1024);

    let stored = intake
        .accept(&upload("rx.png", Some("image/png"), 16), AllowedTypes::ImagesOnly)
        .await
        .unwrap();

    assert!(stored.filename.ends_with("-rx.png"));
    assert_eq!(stored.content_type, "image/png");
    assert_eq!(std::fs::read(&stored.path).unwrap().len(), 16);
    assert!(stored.path.starts_with(intake.dir()));
}

#[tokio::test]
async fn accept_enforces_type_and_size() {
    let root = tempfile::tempdir().unwrap();
    let intake = FileIntake::new(root.path(), 8);

    let err = intake
        .accept(&upload("rx.pdf", Some("application/pdf"), 4), AllowedTypes::ImagesOnly)
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::UnsupportedMediaType(ref m) if m == "application/pdf"));

    let err = intake
        .accept(&upload("rx.png", Some("image/png"), 9), AllowedTypes::Any)
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::PayloadTooLarge { limit: 8 }));

    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn discard_removes_the_stored_file() {
    let root = tempfile::tempdir().unwrap();
    let intake = FileIntake::new(root.path(), 1024);

    let stored = intake
        .accept(&upload("rx.png", Some("image/png"), 4), AllowedTypes::ImagesOnly)
        .await
        .unwrap();
    intake.discard(&stored).await;
    assert!(!stored.path.exists());

    // A second discard only logs.
    intake.discard(&stored).await;
}
