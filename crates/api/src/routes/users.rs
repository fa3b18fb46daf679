//! User profile and social graph routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::UserRepository;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Public profile of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub display_name: String,
    pub photo_url: Option<String>,
}

/// Response body for the friend list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendListResponse {
    pub data: Vec<UserProfileResponse>,
    pub count: usize,
}

/// Get a user's public profile.
///
/// GET /api/v1/users/:user_id
///
/// Profiles of users who have blocked the caller are hidden.
pub async fn get_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .load_app_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.has_blocked(user_auth.user_id) {
        // Indistinguishable from a missing user.
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(UserProfileResponse {
        id: user.id,
        display_name: user.display_name,
        photo_url: user.photo_url,
    }))
}

/// List the current user's friends.
///
/// GET /api/v1/friends
pub async fn list_friends(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<FriendListResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let friend_ids = repo.list_friend_ids(user_auth.user_id).await?;
    let friends = repo.load_app_users(&friend_ids).await?;

    let data: Vec<UserProfileResponse> = friends
        .into_iter()
        .map(|f| UserProfileResponse {
            id: f.id,
            display_name: f.display_name,
            photo_url: f.photo_url,
        })
        .collect();
    let count = data.len();

    Ok(Json(FriendListResponse { data, count }))
}

/// Add a friend.
///
/// POST /api/v1/friends/:user_id
pub async fn add_friend(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(friend_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if friend_id == user_auth.user_id {
        return Err(ApiError::Validation(
            "Cannot add yourself as a friend".to_string(),
        ));
    }

    let repo = UserRepository::new(state.pool.clone());
    let friend = repo
        .load_app_user(friend_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if friend.has_blocked(user_auth.user_id) {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    repo.add_friend(user_auth.user_id, friend_id).await?;

    info!(
        user_id = %user_auth.user_id,
        friend_id = %friend_id,
        "Friend added"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a friend.
///
/// DELETE /api/v1/friends/:user_id
pub async fn remove_friend(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(friend_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    repo.remove_friend(user_auth.user_id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Block a user. Blocking also removes any existing friendship.
///
/// POST /api/v1/users/:user_id/block
pub async fn block_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(blocked_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if blocked_id == user_auth.user_id {
        return Err(ApiError::Validation("Cannot block yourself".to_string()));
    }

    let repo = UserRepository::new(state.pool.clone());
    if repo.find_by_id(blocked_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    repo.add_block(user_auth.user_id, blocked_id).await?;

    info!(
        user_id = %user_auth.user_id,
        blocked_id = %blocked_id,
        "User blocked"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Unblock a user.
///
/// DELETE /api/v1/users/:user_id/block
pub async fn unblock_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(blocked_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    repo.remove_block(user_auth.user_id, blocked_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
