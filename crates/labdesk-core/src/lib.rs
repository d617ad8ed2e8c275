//! labdesk-core
//!
//! Domain types, storage key conventions and the keyword test table shared
//! by every other crate. No I/O and no AWS SDK dependency.

pub mod email;
pub mod keys;
pub mod keywords;
pub mod models;
pub mod outcome;
pub mod tests_list;
