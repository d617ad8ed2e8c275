//! Typed helpers over [`DocumentStore`].

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;
use crate::store::DocumentStore;

/// Load and deserialize the document at `key`.
pub async fn find<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.find_one(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Load and deserialize every document under `prefix`.
pub async fn list<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    store
        .find_many(prefix)
        .await?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(StorageError::from))
        .collect()
}

/// Serialize and create a new document.
pub async fn insert<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let document = serde_json::to_value(value)?;
    store.insert_one(key, document).await
}

/// Serialize and create or replace a document.
pub async fn upsert<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let document = serde_json::to_value(value)?;
    store.upsert(key, document).await
}
