//! Game creation and membership routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::park::SportType;
use domain::models::Game;
use persistence::repositories::{GameRepository, ParkRepository, UserRepository};
use serde::{Deserialize, Serialize};
use shared::validation::validate_name;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Request body for creating a game.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    pub park_id: Uuid,

    /// Court to play on; optional for pickup games without a fixed court.
    pub court_id: Option<Uuid>,

    pub sport_type: SportType,

    /// When the game starts. Absent for pickup games happening now.
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// A game in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: Uuid,
    pub name: String,
    pub park_id: Uuid,
    pub court_id: Option<Uuid>,
    pub sport_type: SportType,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A game with its participant list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailResponse {
    #[serde(flatten)]
    pub game: GameResponse,
    pub participants: Vec<ParticipantResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

fn game_response(game: Game) -> GameResponse {
    GameResponse {
        id: game.id,
        name: game.name,
        park_id: game.park_id,
        court_id: game.court_id,
        sport_type: game.sport_type,
        scheduled_time: game.scheduled_time,
        created_by: game.created_by,
        created_at: game.created_at,
    }
}

/// Create a game at a park.
///
/// POST /api/v1/games
///
/// The creator joins the game automatically.
pub async fn create_game(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    request.validate()?;

    let parks = ParkRepository::new(state.pool.clone());
    let park = parks
        .load_park(request.park_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Park not found".to_string()))?;

    // A named court must belong to the park.
    if let Some(court_id) = request.court_id {
        if !park.courts.iter().any(|c| c.id == court_id) {
            return Err(ApiError::Validation(
                "Court does not belong to this park".to_string(),
            ));
        }
    }

    let users = UserRepository::new(state.pool.clone());
    let creator = users
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    let games = GameRepository::new(state.pool.clone());
    let game = games
        .create_game(
            request.name.trim(),
            request.park_id,
            request.court_id,
            request.sport_type,
            request.scheduled_time,
            creator.id,
            &creator.display_name,
        )
        .await?;

    info!(
        game_id = %game.id,
        park_id = %game.park_id,
        created_by = %creator.id,
        "Game created"
    );

    Ok((StatusCode::CREATED, Json(game_response(game))))
}

/// Get a game with its participants.
///
/// GET /api/v1/games/:game_id
pub async fn get_game(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameDetailResponse>, ApiError> {
    let repo = GameRepository::new(state.pool.clone());
    let game = repo
        .find_by_id(game_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

    let participants: Vec<ParticipantResponse> = repo
        .list_participants(game_id)
        .await?
        .into_iter()
        .map(|p| ParticipantResponse {
            id: p.user_id,
            display_name: p.display_name,
            joined_at: p.joined_at,
        })
        .collect();

    Ok(Json(GameDetailResponse {
        game: game_response(game),
        participants,
    }))
}

/// Join a game.
///
/// POST /api/v1/games/:game_id/join
///
/// Joining a game you are already in is a no-op.
pub async fn join_game(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let games = GameRepository::new(state.pool.clone());
    if games.find_by_id(game_id).await?.is_none() {
        return Err(ApiError::NotFound("Game not found".to_string()));
    }

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    games.join_game(game_id, user.id, &user.display_name).await?;

    info!(game_id = %game_id, user_id = %user.id, "Joined game");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_game_request_valid() {
        let request = CreateGameRequest {
            name: "Saturday Run".to_string(),
            park_id: Uuid::new_v4(),
            court_id: None,
            sport_type: SportType::Basketball,
            scheduled_time: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_game_request_empty_name() {
        let request = CreateGameRequest {
            name: String::new(),
            park_id: Uuid::new_v4(),
            court_id: None,
            sport_type: SportType::Basketball,
            scheduled_time: None,
        };
        assert!(request.validate().is_err());
    }
}
