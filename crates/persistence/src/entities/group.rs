//! Friend group entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::FriendGroup;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the friend_groups table.
#[derive(Debug, Clone, FromRow)]
pub struct FriendGroupEntity {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database row mapping for the friend_group_members table.
///
/// `member_name` is denormalized at group creation so the group can expand
/// into invite recipients without loading every member's profile.
#[derive(Debug, Clone, FromRow)]
pub struct GroupMemberEntity {
    pub group_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub position: i32,
}

impl FriendGroupEntity {
    /// Builds the domain group from this row and its member rows
    /// (assumed ordered by position).
    pub fn into_group(self, members: Vec<GroupMemberEntity>) -> FriendGroup {
        FriendGroup::new(
            self.id,
            self.name,
            self.owner_id,
            members
                .into_iter()
                .map(|m| (m.member_id, m.member_name))
                .collect(),
        )
    }
}
