//! User domain model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A CourtHub user as seen by the social flows.
///
/// `friend_ids` and `blocked_user_ids` are sets: membership checks drive the
/// invite eligibility filter and friend-visible listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub friend_ids: HashSet<Uuid>,
    pub blocked_user_ids: HashSet<Uuid>,
    pub is_admin: bool,
}

impl AppUser {
    /// Whether `other` is in this user's friend set.
    pub fn is_friend(&self, other: Uuid) -> bool {
        self.friend_ids.contains(&other)
    }

    /// Whether this user has blocked `other`.
    pub fn has_blocked(&self, other: Uuid) -> bool {
        self.blocked_user_ids.contains(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(friends: &[Uuid], blocked: &[Uuid]) -> AppUser {
        AppUser {
            id: Uuid::new_v4(),
            email: "hooper@example.com".to_string(),
            display_name: "Hooper".to_string(),
            photo_url: None,
            friend_ids: friends.iter().copied().collect(),
            blocked_user_ids: blocked.iter().copied().collect(),
            is_admin: false,
        }
    }

    #[test]
    fn test_friend_and_block_checks() {
        let friend = Uuid::new_v4();
        let enemy = Uuid::new_v4();
        let user = user_with(&[friend], &[enemy]);

        assert!(user.is_friend(friend));
        assert!(!user.is_friend(enemy));
        assert!(user.has_blocked(enemy));
        assert!(!user.has_blocked(friend));
    }
}
