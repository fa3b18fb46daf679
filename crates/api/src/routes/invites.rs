//! Game invite routes: recipient resolution, persistence, and push fan-out.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::invite::{GameInvite, InviteGameInfo, InviteType};
use domain::services::{
    resolve_recipients, InviteReceivedPayload, NotificationResult, NotificationType,
};
use persistence::repositories::{
    DeviceTokenRepository, GameRepository, GroupRepository, InviteRepository, ParkRepository,
    UserRepository,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_invites_sent;

/// Request body for sending invites.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SendInvitesRequest {
    /// Individually selected friends.
    #[serde(default)]
    pub friend_ids: Vec<Uuid>,

    /// Friend groups to expand into recipients.
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
}

/// Response body after attempting to send invites.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvitesResponse {
    /// False when every selected recipient filtered out; nothing was written.
    pub sent: bool,
    pub recipient_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<InviteResponse>,
}

/// An invite in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub id: Uuid,
    pub game_id: Uuid,
    pub game_name: String,
    pub park_name: String,
    pub court_number: Option<i32>,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub invite_type: InviteType,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub recipient_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteListResponse {
    pub data: Vec<InviteResponse>,
    pub count: usize,
}

fn invite_response(invite: &GameInvite) -> InviteResponse {
    InviteResponse {
        id: invite.id,
        game_id: invite.game_id,
        game_name: invite.game_name.clone(),
        park_name: invite.park_name.clone(),
        court_number: invite.court_number,
        sender_id: invite.sender_id,
        sender_name: invite.sender_name.clone(),
        invite_type: invite.invite_type,
        scheduled_time: invite.scheduled_time,
        recipient_count: invite.recipient_count(),
        created_at: invite.created_at,
    }
}

/// Send invites for a game to friends and friend groups.
///
/// POST /api/v1/games/:game_id/invites
///
/// Recipients are deduplicated in selection order; the sender, non-friends,
/// and anyone in a block relationship with the sender are filtered out. When
/// everyone filters out, nothing is persisted and no pushes go out.
pub async fn send_invites(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(game_id): Path<Uuid>,
    Json(request): Json<SendInvitesRequest>,
) -> Result<(StatusCode, Json<SendInvitesResponse>), ApiError> {
    if request.friend_ids.is_empty() && request.group_ids.is_empty() {
        return Err(ApiError::Validation(
            "Select at least one friend or group".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool.clone());
    let sender = users
        .load_app_user(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    let games = GameRepository::new(state.pool.clone());
    let game = games
        .find_by_id(game_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

    let parks = ParkRepository::new(state.pool.clone());
    let park = parks
        .load_park(game.park_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Park not found".to_string()))?;
    let court_number = game
        .court_id
        .and_then(|id| park.courts.iter().find(|c| c.id == id))
        .map(|c| c.court_number);

    // Only the caller's own groups expand into recipients.
    let groups = GroupRepository::new(state.pool.clone());
    let selected_groups = groups
        .load_groups_by_ids(sender.id, &request.group_ids)
        .await?;

    // Candidate records are needed for current names and block edges.
    let mut candidate_ids: Vec<Uuid> = request.friend_ids.clone();
    for group in &selected_groups {
        candidate_ids.extend(group.members().map(|(id, _)| id));
    }
    let candidates = users.load_app_users(&candidate_ids).await?;

    let recipients =
        resolve_recipients(&sender, &request.friend_ids, &selected_groups, &candidates);

    if recipients.is_empty() {
        info!(
            game_id = %game_id,
            sender_id = %sender.id,
            "All selected recipients filtered out, no invite sent"
        );
        return Ok((
            StatusCode::OK,
            Json(SendInvitesResponse {
                sent: false,
                recipient_count: 0,
                invite: None,
            }),
        ));
    }

    let invite = GameInvite::new(
        InviteGameInfo {
            game_id: game.id,
            game_name: game.name.clone(),
            park_id: park.id,
            park_name: park.name.clone(),
            court_id: game.court_id,
            court_number,
            sport_type: game.sport_type,
            scheduled_time: game.scheduled_time,
        },
        sender.id,
        &sender.display_name,
        recipients.into_pairs(),
    );

    let invites = InviteRepository::new(state.pool.clone());
    invites.create_invite(&invite).await?;

    // Push delivery is best-effort: failures are logged, never surfaced.
    let device_tokens = DeviceTokenRepository::new(state.pool.clone());
    let tokens = device_tokens
        .list_for_users(invite.invited_user_ids())
        .await?;
    let mut sent_count = 0;
    for token in &tokens {
        let payload = InviteReceivedPayload {
            notification_type: NotificationType::InviteReceived,
            invite_id: invite.id,
            game_id: invite.game_id,
            game_name: invite.game_name.clone(),
            park_name: invite.park_name.clone(),
            sender_name: invite.sender_name.clone(),
            scheduled_time: invite.scheduled_time,
            timestamp: Utc::now(),
        };
        match state.notifier.send_invite_received(&token.token, payload).await {
            NotificationResult::Sent => sent_count += 1,
            NotificationResult::Failed(reason) => {
                warn!(
                    invite_id = %invite.id,
                    user_id = %token.user_id,
                    reason = %reason,
                    "Invite push failed"
                );
            }
            NotificationResult::NoToken | NotificationResult::Skipped => {}
        }
    }
    record_invites_sent(sent_count);

    info!(
        invite_id = %invite.id,
        game_id = %game_id,
        sender_id = %sender.id,
        recipient_count = invite.recipient_count(),
        pushes_sent = sent_count,
        "Invite sent"
    );

    let recipient_count = invite.recipient_count();
    Ok((
        StatusCode::CREATED,
        Json(SendInvitesResponse {
            sent: true,
            recipient_count,
            invite: Some(invite_response(&invite)),
        }),
    ))
}

/// List invites addressed to the current user, newest first.
///
/// GET /api/v1/invites
pub async fn list_invites(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<InviteListResponse>, ApiError> {
    let repo = InviteRepository::new(state.pool.clone());
    let invites = repo.list_for_user(user_auth.user_id).await?;

    let data: Vec<InviteResponse> = invites.iter().map(invite_response).collect();
    let count = data.len();

    Ok(Json(InviteListResponse { data, count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_invites_request_defaults() {
        let request: SendInvitesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.friend_ids.is_empty());
        assert!(request.group_ids.is_empty());
    }

    #[test]
    fn test_send_invites_request_camel_case() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"friendIds": ["{}"], "groupIds": []}}"#, id);
        let request: SendInvitesRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.friend_ids, vec![id]);
    }
}
