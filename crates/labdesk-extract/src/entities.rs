//! Medical entity extraction through an external NLP service.
//!
//! The service accepts `POST {base}/extract` with `{"text": "..."}` and
//! answers `{"diagnoses": [...], "symptoms": [...], "medications": [...]}`.

use std::time::Duration;

use labdesk_core::models::entities::ExtractedEntities;
use labdesk_core::outcome::Outcome;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::{bounded, BoxFuture};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Entity extraction capability.
pub trait EntityExtractor: Send + Sync {
    /// Categorize `text`. Never fails: errors degrade to all-empty
    /// categories, which callers treat as "no suggestion".
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Outcome<ExtractedEntities>>;
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

/// HTTP client for the NLP service. Without an endpoint every call
/// degrades immediately.
pub struct HttpEntityExtractor {
    http: reqwest::Client,
    endpoint: Option<String>,
    timeout: Duration,
}

impl HttpEntityExtractor {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: base_url.map(|base| format!("{}/extract", base.trim_end_matches('/'))),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn request(&self, text: &str) -> Result<ExtractedEntities, ExtractError> {
        let endpoint = self.endpoint.as_deref().ok_or(ExtractError::NotConfigured)?;
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }

        let response = self
            .http
            .post(endpoint)
            .json(&ExtractRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let entities: ExtractedEntities = serde_json::from_slice(&body)
            .map_err(|e| ExtractError::ResponseParse(e.to_string()))?;

        debug!(
            diagnoses = entities.diagnoses.len(),
            symptoms = entities.symptoms.len(),
            medications = entities.medications.len(),
            "entities extracted"
        );

        Ok(entities)
    }
}

impl EntityExtractor for HttpEntityExtractor {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Outcome<ExtractedEntities>> {
        Box::pin(async move {
            match bounded(self.timeout, self.request(text)).await {
                Ok(entities) => Outcome::ok(entities),
                Err(e) => {
                    warn!(error = %e, "entity extraction unavailable");
                    Outcome::empty(e.to_string())
                }
            }
        })
    }
}
