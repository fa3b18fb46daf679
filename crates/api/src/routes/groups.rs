//! Friend group routes for bulk invite targeting.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::{GroupRepository, UserRepository};
use serde::{Deserialize, Serialize};
use shared::validation::validate_name;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Request body for creating a friend group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    /// IDs of friends to include as members.
    #[validate(length(min = 1, message = "A group needs at least one member"))]
    pub member_ids: Vec<Uuid>,
}

/// A friend group in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub member_count: usize,
    pub members: Vec<GroupMemberResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberResponse {
    pub id: Uuid,
    pub display_name: String,
}

/// Response body for the group list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListResponse {
    pub data: Vec<GroupResponse>,
    pub count: usize,
}

fn group_response(group: domain::models::FriendGroup) -> GroupResponse {
    let members: Vec<GroupMemberResponse> = group
        .members()
        .map(|(id, name)| GroupMemberResponse {
            id,
            display_name: name.to_string(),
        })
        .collect();
    GroupResponse {
        id: group.id,
        name: group.name.clone(),
        member_count: members.len(),
        members,
    }
}

/// Create a friend group.
///
/// POST /api/v1/groups
///
/// Only the caller's friends can be members; unknown or non-friend IDs are
/// rejected.
pub async fn create_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let owner = users
        .load_app_user(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let members = users.load_app_users(&request.member_ids).await?;
    let mut member_pairs = Vec::with_capacity(request.member_ids.len());
    for wanted in &request.member_ids {
        let Some(member) = members.iter().find(|m| m.id == *wanted) else {
            return Err(ApiError::Validation(format!("Unknown member: {}", wanted)));
        };
        if !owner.is_friend(member.id) {
            return Err(ApiError::Validation(format!(
                "Not a friend: {}",
                member.display_name
            )));
        }
        member_pairs.push((member.id, member.display_name.clone()));
    }

    let groups = GroupRepository::new(state.pool.clone());
    let entity = groups
        .create_group(request.name.trim(), user_auth.user_id, &member_pairs)
        .await?;
    let members = groups.list_members(entity.id).await?;
    let group = entity.into_group(members);

    info!(
        group_id = %group.id,
        owner_id = %user_auth.user_id,
        member_count = group.member_count(),
        "Friend group created"
    );

    Ok((StatusCode::CREATED, Json(group_response(group))))
}

/// List the current user's friend groups.
///
/// GET /api/v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<GroupListResponse>, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let groups = repo.load_user_groups(user_auth.user_id).await?;

    let data: Vec<GroupResponse> = groups.into_iter().map(group_response).collect();
    let count = data.len();

    Ok(Json(GroupListResponse { data, count }))
}

/// Delete a friend group.
///
/// DELETE /api/v1/groups/:group_id
///
/// Only the owner may delete a group.
pub async fn delete_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let deleted = repo.delete_group(group_id, user_auth.user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    info!(group_id = %group_id, "Friend group deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_group_request_needs_members() {
        let request = CreateGroupRequest {
            name: "Ballers".to_string(),
            member_ids: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_group_request_valid() {
        let request = CreateGroupRequest {
            name: "Ballers".to_string(),
            member_ids: vec![Uuid::new_v4()],
        };
        assert!(request.validate().is_ok());
    }
}
