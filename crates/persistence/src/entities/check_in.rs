//! Check-in entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::CheckIn;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the check_ins table.
#[derive(Debug, Clone, FromRow)]
pub struct CheckInEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_photo_url: Option<String>,
    pub park_id: Uuid,
    pub park_name: String,
    pub court_number: i32,
    pub player_count: i32,
    pub check_in_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CheckInEntity> for CheckIn {
    fn from(entity: CheckInEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user_name: entity.user_name,
            user_photo_url: entity.user_photo_url,
            park_id: entity.park_id,
            park_name: entity.park_name,
            court_number: entity.court_number,
            player_count: entity.player_count,
            check_in_time: entity.check_in_time,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
