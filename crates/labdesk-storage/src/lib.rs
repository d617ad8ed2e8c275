//! labdesk-storage
//!
//! Document persistence behind the [`store::DocumentStore`] capability.
//! Documents are JSON values addressed by the keys in `labdesk_core::keys`;
//! S3 backs production, an in-memory map backs tests and local runs.

pub mod client;
pub mod documents;
pub mod error;
pub mod memory;
pub mod s3;
pub mod store;
