//! Document key conventions.
//!
//! Canonical layout of documents in the backing store. Callers pass an
//! already normalized email.

use uuid::Uuid;

pub const USERS_PREFIX: &str = "users/";

pub const PROFILES_PREFIX: &str = "profiles/";

pub const ORDERS_PREFIX: &str = "orders/";

pub fn user(email: &str) -> String {
    format!("{USERS_PREFIX}{}.json", escape(email))
}

pub fn profile(email: &str) -> String {
    format!("{PROFILES_PREFIX}{}.json", escape(email))
}

pub fn orders_prefix(email: &str) -> String {
    format!("{ORDERS_PREFIX}{}/", escape(email))
}

pub fn order(email: &str, id: Uuid) -> String {
    format!("{ORDERS_PREFIX}{}/{id}.json", escape(email))
}

/// Keep a key segment on one level: `/` would split the email across
/// prefixes.
fn escape(segment: &str) -> String {
    segment.replace('/', "%2F")
}
