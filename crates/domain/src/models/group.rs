//! Friend group domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of friends a user can invite all at once.
///
/// `member_ids` and `member_names` are one relation: always the same length
/// and index-aligned. Construct through [`FriendGroup::new`] to keep that
/// invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FriendGroup {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    member_ids: Vec<Uuid>,
    member_names: Vec<String>,
}

impl FriendGroup {
    /// Builds a group from (id, name) member pairs, preserving order.
    pub fn new(id: Uuid, name: String, owner_id: Uuid, members: Vec<(Uuid, String)>) -> Self {
        let (member_ids, member_names) = members.into_iter().unzip();
        Self {
            id,
            name,
            owner_id,
            member_ids,
            member_names,
        }
    }

    pub fn member_ids(&self) -> &[Uuid] {
        &self.member_ids
    }

    pub fn member_names(&self) -> &[String] {
        &self.member_names
    }

    /// Members as (id, name) pairs in group order.
    pub fn members(&self) -> impl Iterator<Item = (Uuid, &str)> + '_ {
        self.member_ids
            .iter()
            .copied()
            .zip(self.member_names.iter().map(String::as_str))
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }
}
