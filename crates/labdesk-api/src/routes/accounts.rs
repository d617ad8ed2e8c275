use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use labdesk_core::models::profile::Profile;
use labdesk_core::models::user::PublicUser;

use crate::accounts::{AccountView, LoginResult, RegisterRequest};
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct UserResponse<U> {
    pub success: bool,
    pub user: U,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Success(UserResponse<PublicUser>),
    Failure(MessageResponse),
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct AccountRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub profile: Option<Profile>,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.accounts.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            success: true,
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Unknown emails and wrong passwords are reported with 200 and
/// `success: false`.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = match state
        .accounts
        .login(req.email.as_deref(), req.password.as_deref())
        .await?
    {
        LoginResult::Success(user) => LoginResponse::Success(UserResponse {
            success: true,
            user,
        }),
        LoginResult::Failure(message) => LoginResponse::Failure(MessageResponse {
            success: false,
            message: message.to_string(),
        }),
    };
    Ok(Json(response))
}

pub async fn account(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AccountRequest>,
) -> Result<Json<UserResponse<AccountView>>, ApiError> {
    let user = state.accounts.account(req.email.as_deref()).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .accounts
        .update_profile(req.email.as_deref(), req.profile)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
    }))
}
