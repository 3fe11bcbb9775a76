//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::User;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, AuthTokens, RegisterInput, RegisterResponse};
use crate::AppState;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Register a staff account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Json<RegisterResponse>> {
    let service = AuthService::new(state.db, &state.config);
    let response = service.register(input).await?;
    Ok(Json(response))
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.login(&input.username, &input.password).await?;
    Ok(Json(tokens))
}

/// Rotate a refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.refresh_token(&input.refresh_token).await?;
    Ok(Json(tokens))
}

/// Current user's profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = AuthService::new(state.db, &state.config);
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// List staff accounts (admin)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current_user.0.require_admin()?;
    let service = AuthService::new(state.db, &state.config);
    let users = service.list_users().await?;
    Ok(Json(users))
}
