use aws_sdk_s3::Client;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_smithy_types::byte_stream::ByteStream;
use serde_json::Value;

use crate::error::StorageError;
use crate::store::{BoxFuture, DocumentStore};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Whether a conditional `If-None-Match: *` put lost to an existing object:
/// 412 `PreconditionFailed`, or 409 `ConditionalRequestConflict` when a
/// concurrent write to the same key is still in flight.
pub fn is_conditional_conflict(code: Option<&str>) -> bool {
    matches!(code, Some("PreconditionFailed" | "ConditionalRequestConflict"))
}

/// Document store backed by JSON objects in an S3 bucket.
#[derive(Clone)]
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(StorageError::GetObject(err.to_string()));
            }
        };

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::GetObject(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(Some(body))
    }

    /// Put a JSON object. With `only_if_absent`, S3 rejects the write with
    /// 412 Precondition Failed when the key already exists.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        only_if_absent: bool,
    ) -> Result<(), StorageError> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(JSON_CONTENT_TYPE)
            .body(ByteStream::from(body));

        if only_if_absent {
            req = req.if_none_match("*");
        }

        req.send().await.map_err(|e| {
            let err = e.into_service_error();
            if only_if_absent && is_conditional_conflict(err.code()) {
                StorageError::AlreadyExists {
                    key: key.to_string(),
                }
            } else {
                StorageError::PutObject(err.to_string())
            }
        })?;

        Ok(())
    }

    /// List keys under a prefix, following continuation tokens.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

            for obj in resp.contents() {
                if let Some(key) = obj.key() {
                    keys.push(key.to_string());
                }
            }

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        Ok(keys)
    }
}

impl DocumentStore for S3DocumentStore {
    fn find_one<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move {
            match self.get_object(key).await? {
                Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
                None => Ok(None),
            }
        })
    }

    fn find_many<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async move {
            let keys = self.list_keys(prefix).await?;

            let mut documents = Vec::with_capacity(keys.len());
            for key in &keys {
                // Deleted between list and get; skip rather than fail the listing.
                if let Some(body) = self.get_object(key).await? {
                    documents.push(serde_json::from_slice(&body)?);
                }
            }

            tracing::debug!(prefix, count = documents.len(), "listed documents");
            Ok(documents)
        })
    }

    fn insert_one<'a>(
        &'a self,
        key: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let body = serde_json::to_vec(&document)?;
            self.put_object(key, body, true).await
        })
    }

    fn upsert<'a>(
        &'a self,
        key: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let body = serde_json::to_vec(&document)?;
            self.put_object(key, body, false).await
        })
    }
}
