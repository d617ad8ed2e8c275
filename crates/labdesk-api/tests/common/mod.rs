#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use labdesk_api::config::AppConfig;
use labdesk_api::state::{Adapters, AppState};
use labdesk_auth::password::Pbkdf2Hasher;
use labdesk_core::models::entities::ExtractedEntities;
use labdesk_core::outcome::Outcome;
use labdesk_extract::entities::EntityExtractor;
use labdesk_extract::ocr::TextExtractor;
use labdesk_extract::BoxFuture;
use labdesk_notify::error::NotifyError;
use labdesk_notify::mailer::Mailer;
use labdesk_storage::error::StorageError;
use labdesk_storage::memory::MemoryStore;
use labdesk_storage::store::{BoxFuture as StoreFuture, DocumentStore};
use serde_json::Value;
use tempfile::TempDir;

/// OCR that returns fixed text, or degrades when it has none. Records the
/// content type of each call and whether the file was on disk.
#[derive(Default)]
pub struct FakeOcr {
    pub text: Option<String>,
    pub calls: Mutex<Vec<(String, bool)>>,
}

impl TextExtractor for FakeOcr {
    fn extract_text<'a>(
        &'a self,
        path: &'a Path,
        mime: &'a str,
    ) -> BoxFuture<'a, Outcome<String>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((mime.to_string(), path.exists()));
            match &self.text {
                Some(text) => Outcome::ok(text.clone()),
                None => Outcome::empty("ocr engine unavailable"),
            }
        })
    }
}

/// Store that reads as empty and rejects every write.
pub struct FailingStore;

impl DocumentStore for FailingStore {
    fn find_one<'a>(
        &'a self,
        _key: &'a str,
    ) -> StoreFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async { Ok(None) })
    }

    fn find_many<'a>(
        &'a self,
        _prefix: &'a str,
    ) -> StoreFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn insert_one<'a>(
        &'a self,
        _key: &'a str,
        _document: Value,
    ) -> StoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Err(StorageError::PutObject("bucket unavailable".to_string())) })
    }

    fn upsert<'a>(
        &'a self,
        _key: &'a str,
        _document: Value,
    ) -> StoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Err(StorageError::PutObject("bucket unavailable".to_string())) })
    }
}

/// Entity extraction that returns fixed entities, or degrades when it has
/// none.
pub struct FakeEntities(pub Option<ExtractedEntities>);

impl EntityExtractor for FakeEntities {
    fn classify<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Outcome<ExtractedEntities>> {
        Box::pin(async move {
            match &self.0 {
                Some(entities) => Outcome::ok(entities.clone()),
                None => Outcome::empty("nlp service unreachable"),
            }
        })
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: bool,
}

impl Mailer for RecordingMailer {
    fn send<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> labdesk_notify::mailer::BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            if self.fail {
                Err(NotifyError::Send("mailbox full".to_string()))
            } else {
                Ok(())
            }
        })
    }
}

impl RecordingMailer {
    /// Wait for the background confirmation task to hand over a message.
    pub async fn wait_for(&self, count: usize) -> Vec<(String, String, String)> {
        for _ in 0..100 {
            {
                let sent = self.sent.lock().unwrap();
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent.lock().unwrap().clone()
    }
}

pub struct Harness {
    pub state: AppState,
    pub config: AppConfig,
    pub store: Arc<MemoryStore>,
    pub ocr: Arc<FakeOcr>,
    pub mailer: Arc<RecordingMailer>,
    pub upload_dir: TempDir,
}

pub struct HarnessOptions {
    pub ocr_text: Option<&'static str>,
    pub entities: Option<ExtractedEntities>,
    pub failing_mailer: bool,
    pub failing_store: bool,
    pub public_base_url: Option<&'static str>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            ocr_text: Some(""),
            entities: Some(ExtractedEntities::default()),
            failing_mailer: false,
            failing_store: false,
            public_base_url: None,
        }
    }
}

pub fn harness(options: HarnessOptions) -> Harness {
    let upload_dir = tempfile::tempdir().unwrap();
    let dir = upload_dir.path().display().to_string();
    let base = options.public_base_url.map(str::to_string);

    let config = AppConfig::from_lookup(|key| match key {
        "UPLOAD_DIR" => Some(dir.clone()),
        "PUBLIC_BASE_URL" => base.clone(),
        "MAIL_TIMEOUT_SECS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();

    let store = Arc::new(MemoryStore::new());
    let ocr = Arc::new(FakeOcr {
        text: options.ocr_text.map(str::to_string),
        ..FakeOcr::default()
    });
    let backing: Arc<dyn DocumentStore> = if options.failing_store {
        Arc::new(FailingStore)
    } else {
        store.clone()
    };
    let mailer = Arc::new(RecordingMailer {
        fail: options.failing_mailer,
        ..RecordingMailer::default()
    });

    let state = AppState::new(
        Adapters {
            store: backing,
            hasher: Arc::new(Pbkdf2Hasher::new(1_000)),
            ocr: ocr.clone(),
            entities: Arc::new(FakeEntities(options.entities)),
            mailer: mailer.clone(),
        },
        &config,
    );

    Harness {
        state,
        config,
        store,
        ocr,
        mailer,
        upload_dir,
    }
}

pub fn png_upload(name: &str) -> labdesk_api::intake::Upload {
    labdesk_api::intake::Upload {
        filename: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: axum::body::Bytes::from_static(b"\x89PNG\r\n\x1a\nfake"),
    }
}

pub fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub const BOUNDARY: &str = "labdesk-test-boundary";

/// Encode a multipart/form-data body with text fields and an optional
/// `(field, filename, content type, bytes)` file part. An empty filename
/// leaves the `filename` parameter out.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((field, filename, content_type, bytes)) = file {
        let disposition = if filename.is_empty() {
            format!("form-data; name=\"{field}\"")
        } else {
            format!("form-data; name=\"{field}\"; filename=\"{filename}\"")
        };
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
