//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// 5 MiB upload ceiling.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Headroom on top of the upload ceiling for the other multipart fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub const DEFAULT_OCR_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreBackend,
    pub bucket: String,
    pub region: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Base for prescription URLs. Unset: derived from the request `Host`.
    pub public_base_url: Option<String>,
    /// Unset: entity extraction is disabled and always degrades.
    pub nlp_service_url: Option<String>,
    pub ocr_model_id: String,
    /// Unset: mail is disabled and always degrades.
    pub mail_from: Option<String>,
    /// Unset: any origin.
    pub cors_origin: Option<String>,
    pub ocr_timeout: Duration,
    pub nlp_timeout: Duration,
    pub mail_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match var("LABDESK_STORE").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("s3") => StoreBackend::S3,
            Some(other) => eyre::bail!("LABDESK_STORE must be `s3` or `memory`, got `{other}`"),
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            port: parse_or(var("PORT"), "PORT", 8080)?,
            store,
            bucket: var("LABDESK_BUCKET").unwrap_or_else(|| "labdesk".to_string()),
            region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            public_base_url: var("PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            nlp_service_url: var("NLP_SERVICE_URL"),
            ocr_model_id: var("OCR_MODEL_ID").unwrap_or_else(|| DEFAULT_OCR_MODEL_ID.to_string()),
            mail_from: var("MAIL_FROM"),
            cors_origin: var("CORS_ORIGIN"),
            ocr_timeout: Duration::from_secs(parse_or(
                var("OCR_TIMEOUT_SECS"),
                "OCR_TIMEOUT_SECS",
                30,
            )?),
            nlp_timeout: Duration::from_secs(parse_or(
                var("NLP_TIMEOUT_SECS"),
                "NLP_TIMEOUT_SECS",
                10,
            )?),
            mail_timeout: Duration::from_secs(parse_or(
                var("MAIL_TIMEOUT_SECS"),
                "MAIL_TIMEOUT_SECS",
                10,
            )?),
            log_format,
        })
    }

    /// Request body ceiling: one upload plus the form fields around it.
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes + MULTIPART_OVERHEAD_BYTES
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> eyre::Result<T> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| eyre::eyre!("{key} has an invalid value: `{value}`")),
        None => Ok(default),
    }
}
