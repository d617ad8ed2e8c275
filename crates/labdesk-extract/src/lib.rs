//! labdesk-extract
//!
//! Prescription analysis adapters: OCR through the Bedrock Converse API and
//! entity extraction through an external NLP service. Both are best-effort
//! and report failure as a degraded [`labdesk_core::outcome::Outcome`].

pub mod client;
pub mod entities;
pub mod error;
pub mod ocr;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::ExtractError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Bound an adapter call. Elapsed time is reported as [`ExtractError::Timeout`].
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, ExtractError>
where
    F: Future<Output = Result<T, ExtractError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ExtractError::Timeout(limit))?
}
