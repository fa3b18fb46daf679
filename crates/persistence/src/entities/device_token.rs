//! Device token entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the device_tokens table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceTokenEntity {
    pub user_id: Uuid,
    pub token: String,
    pub platform: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
