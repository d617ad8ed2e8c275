//! Prescription upload intake.
//!
//! Uploads land in a flat content directory under a
//! `{unix-millis}-{sanitized name}` filename and are served back from
//! `/uploads/{filename}`.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use labdesk_extract::ocr::{upload_format_for_mime, UploadFormat};
use thiserror::Error;
use tracing::{info, warn};

pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("File too large. Maximum {}MB.", limit / (1024 * 1024))]
    PayloadTooLarge { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// MIME allow-list applied by [`FileIntake::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedTypes {
    /// Images the OCR adapter can transcribe: PNG, JPEG, GIF and WebP.
    ImagesOnly,
    Any,
}

impl AllowedTypes {
    pub fn permits(self, content_type: &str) -> bool {
        match self {
            AllowedTypes::ImagesOnly => matches!(
                upload_format_for_mime(content_type),
                Some(UploadFormat::Image(_))
            ),
            AllowedTypes::Any => true,
        }
    }
}

/// A file received in a multipart request, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// The declared content type, or one guessed from the filename.
    pub fn mime(&self) -> String {
        self.content_type
            .clone()
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_path(&self.filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            })
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct FileIntake {
    dir: PathBuf,
    max_bytes: usize,
}

impl FileIntake {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn ensure_dir(&self) -> Result<(), IntakeError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Validate and store an upload.
    ///
    /// Two uploads with the same sanitized name in the same millisecond
    /// overwrite each other.
    pub async fn accept(
        &self,
        upload: &Upload,
        allowed: AllowedTypes,
    ) -> Result<StoredFile, IntakeError> {
        let content_type = upload.mime();
        if !allowed.permits(&content_type) {
            return Err(IntakeError::UnsupportedMediaType(content_type));
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(IntakeError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        self.ensure_dir().await?;

        let filename = stored_name(jiff::Timestamp::now().as_millisecond(), &upload.filename);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, &upload.bytes).await?;

        info!(
            path = %path.display(),
            content_type = %content_type,
            size = upload.bytes.len(),
            "upload stored"
        );

        Ok(StoredFile {
            path,
            filename,
            content_type,
        })
    }

    /// Remove a stored upload. Failures are logged, not returned.
    pub async fn discard(&self, stored: &StoredFile) {
        if let Err(e) = tokio::fs::remove_file(&stored.path).await {
            warn!(path = %stored.path.display(), error = %e, "failed to remove upload");
        }
    }
}

/// `{millis}-{name}` with each whitespace run collapsed to `_`.
///
/// Only the last path component is kept so the name stays inside the
/// content directory. Characters outside letters, digits, `.`, `-` and `_`
/// are dropped, which keeps the name usable as a URL path segment as-is.
pub fn stored_name(millis: i64, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut name = String::with_capacity(base.len());
    let mut in_space = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
                in_space = true;
            }
        } else if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
            name.push(c);
            in_space = false;
        }
    }

    let name = name.trim_start_matches('.');
    if name.is_empty() {
        format!("{millis}-upload")
    } else {
        format!("{millis}-{name}")
    }
}

/// Public URL of a stored file.
pub fn public_url(base: &str, filename: &str) -> String {
    format!("{}{UPLOADS_ROUTE}/{filename}", base.trim_end_matches('/'))
}
