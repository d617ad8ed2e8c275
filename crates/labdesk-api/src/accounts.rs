//! Registration, login and profile management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use labdesk_audit::events::AuditEvent;
use labdesk_auth::password::PasswordHasher;
use labdesk_core::email;
use labdesk_core::keys;
use labdesk_core::models::profile::Profile;
use labdesk_core::models::user::{parse_age, PublicUser, User};
use labdesk_storage::documents;
use labdesk_storage::store::DocumentStore;

use crate::error::{ApiError, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub age: serde_json::Value,
    pub phone: Option<String>,
}

/// Login either succeeds with the public user or fails with a reason the
/// client shows as-is.
#[derive(Debug)]
pub enum LoginResult {
    Success(PublicUser),
    Failure(&'static str),
}

/// A user merged with their profile, as returned by `/account`.
#[derive(Debug, Serialize)]
pub struct AccountView {
    #[serde(flatten)]
    pub user: PublicUser,
    #[serde(flatten)]
    pub profile: Profile,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    hasher: Arc<dyn PasswordHasher>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AccountService {
    pub fn new(store: Arc<dyn DocumentStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<PublicUser, ApiError> {
        let (Some(user_id), Some(user_name), Some(password), Some(email)) = (
            present(req.user_id.as_deref()),
            present(req.user_name.as_deref()),
            req.password.as_deref().filter(|p| !p.is_empty()),
            email::normalize_opt(req.email.as_deref()),
        ) else {
            return Err(ValidationError::MissingRequiredField(
                "userId, userName, password, email".to_string(),
            )
            .into());
        };

        let key = keys::user(&email);
        if self.store.find_one(&key).await?.is_some() {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash(password.to_string()).await?;
        let user = User {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            email: email.clone(),
            password: password_hash,
            age: parse_age(&req.age),
            phone: present(req.phone.as_deref()).map(str::to_string),
            created_at: jiff::Timestamp::now(),
        };

        // A concurrent registration can win between the check and the insert.
        documents::insert(self.store.as_ref(), &key, &user)
            .await
            .map_err(|e| match ApiError::from(e) {
                ApiError::Conflict(_) => ApiError::Conflict("Email already registered".to_string()),
                other => other,
            })?;

        info!(email = %email, "user registered");
        AuditEvent::user_registered(&email).emit();

        Ok(user.into())
    }

    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginResult, ApiError> {
        let (Some(email), Some(password)) = (email::normalize_opt(email), password) else {
            return Err(ValidationError::MissingRequiredField("email, password".to_string()).into());
        };

        let Some(user) = documents::find::<User>(self.store.as_ref(), &keys::user(&email)).await?
        else {
            return Ok(LoginResult::Failure("User not found"));
        };

        if !self.verify(password.to_string(), user.password.clone()).await? {
            return Ok(LoginResult::Failure("Incorrect password"));
        }

        Ok(LoginResult::Success(user.into()))
    }

    pub async fn account(&self, email: Option<&str>) -> Result<AccountView, ApiError> {
        let email = email::normalize_opt(email).ok_or(ValidationError::MissingEmail)?;

        let user = documents::find::<User>(self.store.as_ref(), &keys::user(&email))
            .await?
            .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
        let profile = documents::find::<Profile>(self.store.as_ref(), &keys::profile(&email))
            .await?
            .unwrap_or_default();

        Ok(AccountView {
            user: user.into(),
            profile,
        })
    }

    /// Upsert the profile, overwriting only the fields present in `patch`.
    pub async fn update_profile(
        &self,
        email: Option<&str>,
        patch: Option<Profile>,
    ) -> Result<Profile, ApiError> {
        let (Some(email), Some(patch)) = (email::normalize_opt(email), patch) else {
            return Err(ValidationError::MissingRequiredField("email, profile".to_string()).into());
        };

        let key = keys::profile(&email);
        let mut profile = documents::find::<Profile>(self.store.as_ref(), &key)
            .await?
            .unwrap_or_default();
        profile.apply(patch);
        documents::upsert(self.store.as_ref(), &key, &profile).await?;

        AuditEvent::profile_updated(&email).emit();
        Ok(profile)
    }

    /// Hashing and verification run on the blocking pool.
    async fn hash(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }

    async fn verify(&self, password: String, stored: String) -> Result<bool, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}
