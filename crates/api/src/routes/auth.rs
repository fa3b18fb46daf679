//! Authentication routes for account creation, login, and token management.

use axum::{extract::State, http::StatusCode, Json};
use persistence::repositories::{DeviceTokenRepository, UserRepository};
use serde::{Deserialize, Serialize};
use shared::password::{hash_password, verify_password};
use shared::validation::{normalize_email, validate_display_name};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Request body for account creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(custom(function = "validate_display_name"))]
    pub display_name: String,

    pub photo_url: Option<String>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for refreshing tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for signing out (drops the device push token, if any).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignoutRequest {
    #[serde(default)]
    pub device_token: Option<String>,
}

/// User information in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

/// Token information in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for successful signup or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

fn user_response(entity: &persistence::entities::UserEntity) -> UserResponse {
    UserResponse {
        id: entity.id.to_string(),
        email: entity.email.clone(),
        display_name: entity.display_name.clone(),
        photo_url: entity.photo_url.clone(),
        is_admin: entity.is_admin,
        created_at: entity.created_at.to_rfc3339(),
    }
}

fn issue_tokens(state: &AppState, user_id: uuid::Uuid) -> Result<TokensResponse, ApiError> {
    let (access_token, _) = state.jwt.generate_access_token(user_id)?;
    let (refresh_token, _) = state.jwt.generate_refresh_token(user_id)?;
    Ok(TokensResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.access_token_expiry_secs,
    })
}

/// Create a new account with email and password.
///
/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let repo = UserRepository::new(state.pool.clone());

    if repo.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let user = repo
        .create_user(
            &email,
            &password_hash,
            request.display_name.trim(),
            request.photo_url.as_deref(),
        )
        .await?;

    let tokens = issue_tokens(&state, user.id)?;

    info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user_response(&user),
            tokens,
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let repo = UserRepository::new(state.pool.clone());

    // Same error for unknown email and wrong password.
    let user = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let tokens = issue_tokens(&state, user.id)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user_response(&user),
        tokens,
    }))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    let claims = state
        .jwt
        .validate_refresh_token(&request.refresh_token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;
    let user_id = shared::jwt::extract_user_id(&claims)?;

    // The account may have been deleted since the token was issued.
    let repo = UserRepository::new(state.pool.clone());
    if repo.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::Unauthorized("Account no longer exists".to_string()));
    }

    let tokens = issue_tokens(&state, user_id)?;
    Ok(Json(tokens))
}

/// Get the current user's profile.
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user_response(&user)))
}

/// Sign out, dropping the supplied device push token.
///
/// POST /api/v1/auth/signout
pub async fn signout(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<SignoutRequest>,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = request.device_token.as_deref() {
        let repo = DeviceTokenRepository::new(state.pool.clone());
        repo.delete(user_auth.user_id, token).await?;
    }

    info!(user_id = %user_auth.user_id, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the current user's account and all related data.
///
/// DELETE /api/v1/auth/account
pub async fn delete_account(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<StatusCode, ApiError> {
    // Stop push delivery first so no notification races the deletion.
    let tokens = DeviceTokenRepository::new(state.pool.clone());
    tokens.delete_all_for_user(user_auth.user_id).await?;

    let repo = UserRepository::new(state.pool.clone());
    let deleted = repo.delete_user(user_auth.user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = %user_auth.user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            email: "test@example.com".to_string(),
            password: "longenough".to_string(),
            display_name: "Jordan".to_string(),
            photo_url: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_invalid_email() {
        let request = SignupRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            display_name: "Jordan".to_string(),
            photo_url: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_short_password() {
        let request = SignupRequest {
            email: "test@example.com".to_string(),
            password: "short".to_string(),
            display_name: "Jordan".to_string(),
            photo_url: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_bad_display_name() {
        let request = SignupRequest {
            email: "test@example.com".to_string(),
            password: "longenough".to_string(),
            display_name: "<script>".to_string(),
            photo_url: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_empty_password() {
        let request = LoginRequest {
            email: "test@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
