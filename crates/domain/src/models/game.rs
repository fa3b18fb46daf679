//! Game domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::park::SportType;

/// A pickup or scheduled game at a park.
///
/// `court_id` may reference a court that no longer exists at the park
/// (QR posters and old invites outlive court renumbering); resolution
/// falls back to the park's first court in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub park_id: Uuid,
    pub court_id: Option<Uuid>,
    pub sport_type: SportType,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
