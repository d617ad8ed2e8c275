//! labdesk-auth
//!
//! Password hashing behind the [`password::PasswordHasher`] capability.

pub mod error;
pub mod password;
