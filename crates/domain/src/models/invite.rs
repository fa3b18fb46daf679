//! Game invite domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::park::SportType;

/// Whether an invite is for a pickup game happening now or a scheduled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteType {
    Pickup,
    Scheduled,
}

/// An invitation sent to a set of users to join a game.
///
/// `invited_user_ids` and `invited_user_names` are one relation: always the
/// same length, index-aligned, deduplicated, ordered. Construct through
/// [`GameInvite::new`] to keep that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GameInvite {
    pub id: Uuid,
    pub game_id: Uuid,
    pub game_name: String,
    pub park_id: Uuid,
    pub park_name: String,
    pub court_id: Option<Uuid>,
    pub court_number: Option<i32>,
    pub sport_type: SportType,
    pub sender_id: Uuid,
    pub sender_name: String,
    invited_user_ids: Vec<Uuid>,
    invited_user_names: Vec<String>,
    pub invite_type: InviteType,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields describing the game an invite points at.
#[derive(Debug, Clone)]
pub struct InviteGameInfo {
    pub game_id: Uuid,
    pub game_name: String,
    pub park_id: Uuid,
    pub park_name: String,
    pub court_id: Option<Uuid>,
    pub court_number: Option<i32>,
    pub sport_type: SportType,
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl GameInvite {
    /// Builds an invite from resolved recipient (id, name) pairs.
    ///
    /// The invite type follows from the game: a scheduled time makes it a
    /// scheduled invite, otherwise it is a pickup invite.
    pub fn new(
        game: InviteGameInfo,
        sender_id: Uuid,
        sender_name: &str,
        recipients: Vec<(Uuid, String)>,
    ) -> Self {
        let invite_type = if game.scheduled_time.is_some() {
            InviteType::Scheduled
        } else {
            InviteType::Pickup
        };
        let (invited_user_ids, invited_user_names) = recipients.into_iter().unzip();
        Self {
            id: Uuid::new_v4(),
            game_id: game.game_id,
            game_name: game.game_name,
            park_id: game.park_id,
            park_name: game.park_name,
            court_id: game.court_id,
            court_number: game.court_number,
            sport_type: game.sport_type,
            sender_id,
            sender_name: sender_name.to_string(),
            invited_user_ids,
            invited_user_names,
            invite_type,
            scheduled_time: game.scheduled_time,
            created_at: Utc::now(),
        }
    }

    pub fn invited_user_ids(&self) -> &[Uuid] {
        &self.invited_user_ids
    }

    pub fn invited_user_names(&self) -> &[String] {
        &self.invited_user_names
    }

    /// Recipients as (id, name) pairs in invite order.
    pub fn recipients(&self) -> impl Iterator<Item = (Uuid, &str)> + '_ {
        self.invited_user_ids
            .iter()
            .copied()
            .zip(self.invited_user_names.iter().map(String::as_str))
    }

    pub fn recipient_count(&self) -> usize {
        self.invited_user_ids.len()
    }
}
