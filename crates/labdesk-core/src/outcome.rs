//! Result type for best-effort adapters.
//!
//! OCR, entity extraction and mail never fail the request that invoked
//! them. Instead of swallowing errors into logs they return an [`Outcome`],
//! which always carries a usable value and records why it is degraded.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok { value: T },
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Outcome::Ok { value }
    }

    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Outcome::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok { value } | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok { value } | Outcome::Degraded { value, .. } => value,
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Degrade to the type's empty value.
    pub fn empty(reason: impl Into<String>) -> Self {
        Outcome::degraded(T::default(), reason)
    }
}
