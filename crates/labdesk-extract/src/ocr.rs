//! Prescription text recognition via the Bedrock Converse API.
//!
//! Images go out as `ImageBlock`s, PDFs as `DocumentBlock`s; the model is
//! asked for a plain transcription. Any failure degrades to empty text so
//! the booking flow stays usable without OCR.

use std::path::Path;
use std::time::Duration;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, DocumentBlock, DocumentFormat, DocumentSource, ImageBlock,
    ImageFormat, ImageSource, Message, SystemContentBlock,
};
use labdesk_core::outcome::Outcome;
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::{bounded, BoxFuture};

const OCR_SYSTEM_PROMPT: &str = "\
You transcribe medical prescriptions. \
Return only the text visible in the document, line by line. \
Do not add commentary, headers, or formatting.";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Text extraction capability over a stored upload.
pub trait TextExtractor: Send + Sync {
    /// Recognize the text in the file at `path`, stored with content type
    /// `mime`. Never fails: errors degrade to an empty string.
    fn extract_text<'a>(&'a self, path: &'a Path, mime: &'a str)
        -> BoxFuture<'a, Outcome<String>>;
}

/// What the Converse API needs to know about an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadFormat {
    Image(ImageFormat),
    Document(DocumentFormat),
}

/// Map a MIME type to the block type Bedrock accepts. Parameters such as
/// `; charset=...` are ignored.
///
/// Returns `None` for types that can't be transcribed.
pub fn upload_format_for_mime(mime: &str) -> Option<UploadFormat> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/png" => Some(UploadFormat::Image(ImageFormat::Png)),
        "image/jpeg" | "image/jpg" => Some(UploadFormat::Image(ImageFormat::Jpeg)),
        "image/gif" => Some(UploadFormat::Image(ImageFormat::Gif)),
        "image/webp" => Some(UploadFormat::Image(ImageFormat::Webp)),
        "application/pdf" => Some(UploadFormat::Document(DocumentFormat::Pdf)),
        _ => None,
    }
}

/// Map a file extension to the block type Bedrock accepts.
///
/// Returns `None` for extensions that can't be transcribed.
pub fn upload_format_for_extension(ext: &str) -> Option<UploadFormat> {
    match ext.to_lowercase().as_str() {
        "png" => Some(UploadFormat::Image(ImageFormat::Png)),
        "jpg" | "jpeg" => Some(UploadFormat::Image(ImageFormat::Jpeg)),
        "gif" => Some(UploadFormat::Image(ImageFormat::Gif)),
        "webp" => Some(UploadFormat::Image(ImageFormat::Webp)),
        "pdf" => Some(UploadFormat::Document(DocumentFormat::Pdf)),
        _ => None,
    }
}

/// OCR backed by a multimodal Bedrock model.
pub struct BedrockOcr {
    client: Client,
    model_id: String,
    timeout: Duration,
}

impl BedrockOcr {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Block type from the content type, then from the extension.
    fn format_of(path: &Path, mime: &str) -> Result<UploadFormat, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        upload_format_for_mime(mime)
            .or_else(|| upload_format_for_extension(ext))
            .ok_or_else(|| ExtractError::UnsupportedFormat(format!("{mime} (.{ext})")))
    }

    async fn transcribe(&self, path: &Path, mime: &str) -> Result<String, ExtractError> {
        let format = Self::format_of(path, mime)?;

        let bytes = tokio::fs::read(path).await.map_err(|source| ExtractError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let blob = aws_smithy_types::Blob::new(bytes);

        let upload_block = match format {
            UploadFormat::Image(format) => ContentBlock::Image(
                ImageBlock::builder()
                    .format(format)
                    .source(ImageSource::Bytes(blob))
                    .build()
                    .map_err(|e| ExtractError::Invocation(e.to_string()))?,
            ),
            UploadFormat::Document(format) => {
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("prescription");
                ContentBlock::Document(
                    DocumentBlock::builder()
                        .format(format)
                        .name(sanitize_document_name(filename))
                        .source(DocumentSource::Bytes(blob))
                        .build()
                        .map_err(|e| ExtractError::Invocation(e.to_string()))?,
                )
            }
        };

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(upload_block)
            .content(ContentBlock::Text(
                "Transcribe this prescription.".to_string(),
            ))
            .build()
            .map_err(|e| ExtractError::Invocation(e.to_string()))?;

        info!(model_id = %self.model_id, path = %path.display(), "running OCR");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(OCR_SYSTEM_PROMPT.to_string()))
            .messages(message)
            .send()
            .await
            .map_err(|e| ExtractError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| {
                ExtractError::ResponseParse("no message in response".to_string())
            })?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        info!(path = %path.display(), text_len = text.len(), "OCR complete");

        Ok(text)
    }
}

impl TextExtractor for BedrockOcr {
    fn extract_text<'a>(
        &'a self,
        path: &'a Path,
        mime: &'a str,
    ) -> BoxFuture<'a, Outcome<String>> {
        Box::pin(async move {
            match bounded(self.timeout, self.transcribe(path, mime)).await {
                Ok(text) => Outcome::ok(text),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        mime,
                        error = %e,
                        "OCR failed, continuing without text"
                    );
                    Outcome::empty(e.to_string())
                }
            }
        })
    }
}

/// Sanitize a filename for use as a Bedrock `DocumentBlock` name.
///
/// The name field only allows alphanumeric characters, single whitespace,
/// hyphens, parentheses, and square brackets.
pub fn sanitize_document_name(filename: &str) -> String {
    let mut result = String::with_capacity(filename.len());
    let mut prev_space = true;

    for c in filename.chars() {
        if c.is_alphanumeric() || matches!(c, '-' | '(' | ')' | '[' | ']') {
            result.push(c);
            prev_space = false;
        } else if !prev_space {
            result.push(' ');
            prev_space = true;
        }
    }

    let trimmed = result.trim_end();
    if trimmed.is_empty() {
        "prescription".to_string()
    } else {
        trimmed.to_string()
    }
}
