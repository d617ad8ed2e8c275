use std::collections::BTreeMap;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::{BoxFuture, DocumentStore};

/// In-process document store. Keys are kept sorted, so prefix listing
/// returns documents in key order.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn find_one<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move { Ok(self.documents.read().await.get(key).cloned()) })
    }

    fn find_many<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async move {
            let documents = self.documents.read().await;
            Ok(documents
                .range(prefix.to_string()..)
                .take_while(|(key, _)| key.starts_with(prefix))
                .map(|(_, value)| value.clone())
                .collect())
        })
    }

    fn insert_one<'a>(
        &'a self,
        key: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut documents = self.documents.write().await;
            if documents.contains_key(key) {
                return Err(StorageError::AlreadyExists {
                    key: key.to_string(),
                });
            }
            documents.insert(key.to_string(), document);
            Ok(())
        })
    }

    fn upsert<'a>(
        &'a self,
        key: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.documents
                .write()
                .await
                .insert(key.to_string(), document);
            Ok(())
        })
    }
}
