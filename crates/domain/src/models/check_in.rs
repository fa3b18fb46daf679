//! Check-in domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::park::Park;

/// Minimum players a check-in can assert.
pub const MIN_PLAYER_COUNT: i32 = 1;

/// Maximum players a check-in can assert.
pub const MAX_PLAYER_COUNT: i32 = 10;

/// Clamps a player count into the allowed 1..=10 range.
pub fn clamp_player_count(count: i32) -> i32 {
    count.clamp(MIN_PLAYER_COUNT, MAX_PLAYER_COUNT)
}

/// A record asserting a user is currently present at a park court.
///
/// Ids are server-assigned UUIDs; the park and user names are denormalized
/// onto the record so player-count listings render without extra lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckIn {
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

impl CheckIn {
    /// Creates a new check-in for `user` at the given park court.
    ///
    /// The player count is clamped into range here so no out-of-range value
    /// can reach persistence regardless of how the prompt answered.
    pub fn new(
        user_id: Uuid,
        user_name: &str,
        user_photo_url: Option<&str>,
        park: &Park,
        court_number: i32,
        player_count: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_name: user_name.to_string(),
            user_photo_url: user_photo_url.map(str::to_string),
            park_id: park.id,
            park_name: park.name.clone(),
            court_number,
            player_count: clamp_player_count(player_count),
            check_in_time: now,
            created_at: now,
            updated_at: now,
        }
    }
}
