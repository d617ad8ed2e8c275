//! Email normalization.
//!
//! The normalized email is the de facto primary key joining users, profiles
//! and orders, so every write and every lookup goes through [`normalize`].

/// Trim surrounding whitespace and lower-case.
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize an optional email, treating blank input as absent.
pub fn normalize_opt(email: Option<&str>) -> Option<String> {
    email.map(normalize).filter(|e| !e.is_empty())
}
