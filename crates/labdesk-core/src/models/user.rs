use serde::{Deserialize, Serialize};

/// A registered account, as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    /// Normalized (trimmed, lower-cased). Unique across users.
    pub email: String,
    /// Salted password hash. Never leaves the server.
    pub password: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub created_at: jiff::Timestamp,
}

/// A [`User`] with the password hash stripped, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name,
            email: user.email,
            age: user.age,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

/// Lenient age parsing for registration input.
///
/// Accepts a JSON number or a string with leading digits (`"42"`,
/// `" 42 years"`). Anything unparsable, and zero, becomes `None`.
pub fn parse_age(raw: &serde_json::Value) -> Option<u32> {
    let age = match raw {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))?,
        serde_json::Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()?
        }
        _ => return None,
    };
    u32::try_from(age).ok().filter(|a| *a > 0)
}
