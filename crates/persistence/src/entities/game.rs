//! Game entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::Game;
use sqlx::FromRow;
use uuid::Uuid;

use super::park::SportTypeDb;

/// Database row mapping for the games table.
#[derive(Debug, Clone, FromRow)]
pub struct GameEntity {
    pub id: Uuid,
    pub name: String,
    pub park_id: Uuid,
    pub court_id: Option<Uuid>,
    pub sport_type: SportTypeDb,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database row mapping for the game_participants table.
#[derive(Debug, Clone, FromRow)]
pub struct GameParticipantEntity {
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<GameEntity> for Game {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            park_id: entity.park_id,
            court_id: entity.court_id,
            sport_type: entity.sport_type.into(),
            scheduled_time: entity.scheduled_time,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}
