use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Document store capability injected into every service that persists
/// users, profiles or orders.
///
/// Keys follow `labdesk_core::keys`; a "collection" is a key prefix.
/// Methods return boxed futures for dyn compatibility.
pub trait DocumentStore: Send + Sync {
    /// Fetch the document at `key`. `Ok(None)` when absent.
    fn find_one<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>>;

    /// Fetch every document whose key starts with `prefix`.
    fn find_many<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StorageError>>;

    /// Create the document at `key`. Fails with
    /// [`StorageError::AlreadyExists`] if a document is already there.
    fn insert_one<'a>(
        &'a self,
        key: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Create or replace the document at `key`.
    fn upsert<'a>(&'a self, key: &'a str, document: Value)
        -> BoxFuture<'a, Result<(), StorageError>>;
}
