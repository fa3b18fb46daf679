//! Game invite entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::invite::InviteType;
use sqlx::FromRow;
use uuid::Uuid;

use super::park::SportTypeDb;

/// Database enum mapping to the PostgreSQL `invite_type` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invite_type", rename_all = "snake_case")]
pub enum InviteTypeDb {
    Pickup,
    Scheduled,
}

impl From<InviteTypeDb> for InviteType {
    fn from(db: InviteTypeDb) -> Self {
        match db {
            InviteTypeDb::Pickup => InviteType::Pickup,
            InviteTypeDb::Scheduled => InviteType::Scheduled,
        }
    }
}

impl From<InviteType> for InviteTypeDb {
    fn from(kind: InviteType) -> Self {
        match kind {
            InviteType::Pickup => InviteTypeDb::Pickup,
            InviteType::Scheduled => InviteTypeDb::Scheduled,
        }
    }
}

/// Database row mapping for the game_invites table.
#[derive(Debug, Clone, FromRow)]
pub struct GameInviteEntity {
    pub id: Uuid,
    pub game_id: Uuid,
    pub game_name: String,
    pub park_id: Uuid,
    pub park_name: String,
    pub court_id: Option<Uuid>,
    pub court_number: Option<i32>,
    pub sport_type: SportTypeDb,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub invite_type: InviteTypeDb,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Database row mapping for the invite_recipients table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteRecipientEntity {
    pub invite_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub position: i32,
}
