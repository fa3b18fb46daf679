//! Device token registration routes for push notifications.

use axum::{extract::State, http::StatusCode, Json};
use persistence::repositories::DeviceTokenRepository;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Request body for registering a device token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    #[validate(length(min = 1, message = "Token must not be empty"))]
    pub token: String,

    /// Device platform, e.g. "ios" or "android".
    pub platform: Option<String>,
}

/// Request body for removing a device token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTokenRequest {
    #[validate(length(min = 1, message = "Token must not be empty"))]
    pub token: String,
}

/// Register or refresh a device token for the current user.
///
/// PUT /api/v1/notifications/token
///
/// Re-registering the same token is a refresh, not an error.
pub async fn register_token(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<RegisterTokenRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let repo = DeviceTokenRepository::new(state.pool.clone());
    repo.upsert(
        user_auth.user_id,
        request.token.trim(),
        request.platform.as_deref(),
    )
    .await?;

    info!(user_id = %user_auth.user_id, "Device token registered");
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a device token for the current user.
///
/// DELETE /api/v1/notifications/token
pub async fn remove_token(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<RemoveTokenRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let repo = DeviceTokenRepository::new(state.pool.clone());
    let deleted = repo.delete(user_auth.user_id, request.token.trim()).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Token not registered".to_string()));
    }

    info!(user_id = %user_auth.user_id, "Device token removed");
    Ok(StatusCode::NO_CONTENT)
}
