use std::path::Path;
use std::time::Duration;

use aws_sdk_bedrockruntime::types::{DocumentFormat, ImageFormat};
use labdesk_extract::ocr::{
    sanitize_document_name, upload_format_for_extension, upload_format_for_mime, BedrockOcr,
    TextExtractor, UploadFormat,
};

fn offline_client() -> aws_sdk_bedrockruntime::Client {
    let config = aws_sdk_bedrockruntime::Config::builder()
        .behavior_version(aws_sdk_bedrockruntime::config::BehaviorVersion::latest())
        .region(aws_sdk_bedrockruntime::config::Region::new("us-east-1"))
        .build();
    aws_sdk_bedrockruntime::Client::from_conf(config)
}

#[test]
fn extensions_map_to_blocks() {
    assert_eq!(
        upload_format_for_extension("JPG"),
        Some(UploadFormat::Image(ImageFormat::Jpeg))
    );
    assert_eq!(
        upload_format_for_extension("png"),
        Some(UploadFormat::Image(ImageFormat::Png))
    );
    assert_eq!(
        upload_format_for_extension("pdf"),
        Some(UploadFormat::Document(DocumentFormat::Pdf))
    );
    assert_eq!(upload_format_for_extension("txt"), None);
}

#[test]
fn content_types_map_to_blocks() {
    assert_eq!(
        upload_format_for_mime("image/png"),
        Some(UploadFormat::Image(ImageFormat::Png))
    );
    assert_eq!(
        upload_format_for_mime("IMAGE/JPEG; q=0.9"),
        Some(UploadFormat::Image(ImageFormat::Jpeg))
    );
    assert_eq!(
        upload_format_for_mime("application/pdf"),
        Some(UploadFormat::Document(DocumentFormat::Pdf))
    );
    assert_eq!(upload_format_for_mime("image/heic"), None);
    assert_eq!(upload_format_for_mime("image/tiff"), None);
    assert_eq!(upload_format_for_mime("image/bmp"), None);
}

#[test]
fn document_names_are_sanitized() {
    assert_eq!(sanitize_document_name("1700-rx_scan.final.pdf"), "1700-rx scan final pdf");
    assert_eq!(sanitize_document_name("__"), "prescription");
}

#[tokio::test]
async fn missing_file_degrades_to_empty_text() {
    let ocr = BedrockOcr::new(offline_client(), "test-model");
    let outcome = ocr
        .extract_text(Path::new("/nonexistent/rx.png"), "image/png")
        .await;
    assert!(outcome.is_degraded());
    assert_eq!(outcome.value(), "");
}

#[tokio::test]
async fn unsupported_format_degrades_without_invoking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "fever").unwrap();

    let ocr = BedrockOcr::new(offline_client(), "test-model");
    let outcome = ocr.extract_text(&path, "text/plain").await;
    assert!(outcome.is_degraded());
    assert!(outcome.reason().unwrap().contains("unsupported file format"));
}

#[tokio::test]
async fn content_type_is_used_when_the_name_has_no_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1700000000000-prescription");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nfake").unwrap();

    // No credentials are configured, so the call fails after the request
    // has been built from the image block.
    let ocr =
        BedrockOcr::new(offline_client(), "test-model").with_timeout(Duration::from_secs(5));
    let outcome = ocr.extract_text(&path, "image/png").await;

    let reason = outcome.reason().unwrap();
    assert!(!reason.contains("unsupported file format"), "{reason}");
    assert!(!reason.contains("failed to read"), "{reason}");
}

#[tokio::test]
async fn extensionless_file_with_unknown_type_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1700000000000-prescription");
    std::fs::write(&path, b"II*\0").unwrap();

    let ocr = BedrockOcr::new(offline_client(), "test-model");
    let outcome = ocr.extract_text(&path, "image/tiff").await;
    assert!(outcome.reason().unwrap().contains("unsupported file format"));
}
