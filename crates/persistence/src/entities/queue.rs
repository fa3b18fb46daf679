//! Court queue entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the queue_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct QueueEntryEntity {
    pub id: Uuid,
    pub park_id: Uuid,
    pub court_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}
