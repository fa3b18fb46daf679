//! Invite recipient resolution.
//!
//! Expands a selection of friends and friend groups into the final,
//! deduplicated, block-aware recipient set for a game invite. The filter is
//! deterministic and pure; callers treat an empty result as "no eligible
//! recipients" and skip sending rather than erroring.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{AppUser, FriendGroup};

/// Resolved recipients for a game invite.
///
/// `ids` and `names` are index-aligned: `ids[i]` corresponds to `names[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipientList {
    pub ids: Vec<Uuid>,
    pub names: Vec<String>,
}

impl RecipientList {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Recipients as owned (id, name) pairs in resolution order.
    pub fn into_pairs(self) -> Vec<(Uuid, String)> {
        self.ids.into_iter().zip(self.names).collect()
    }
}

/// Computes the eligible recipient set for an invite sent by `sender`.
///
/// Candidates are the directly selected friends (in selection order) followed
/// by the members of each selected group (in group order). A candidate is
/// kept when all of the following hold:
///
/// - it is not the sender,
/// - it has not been seen already (stable first-seen dedup, not a sort),
/// - it is in the sender's friend set,
/// - the sender has not blocked it,
/// - when its own record is available in `candidate_friends`, it has not
///   blocked the sender (mutual-block symmetry enforced here, independent of
///   any filtering already applied upstream).
///
/// Names come from the candidate's own record when available, falling back
/// to the name carried by the selecting group.
pub fn resolve_recipients(
    sender: &AppUser,
    selected_friend_ids: &[Uuid],
    selected_groups: &[FriendGroup],
    candidate_friends: &[AppUser],
) -> RecipientList {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut result = RecipientList::default();

    let lookup = |id: Uuid| candidate_friends.iter().find(|u| u.id == id);

    let mut consider = |id: Uuid, group_name: Option<&str>| {
        if id == sender.id || !seen.insert(id) {
            return;
        }
        if !sender.is_friend(id) || sender.has_blocked(id) {
            return;
        }
        let record = lookup(id);
        if record.is_some_and(|u| u.has_blocked(sender.id)) {
            return;
        }
        let name = record
            .map(|u| u.display_name.clone())
            .or_else(|| group_name.map(str::to_string));
        let Some(name) = name else {
            // No record and no group-carried name: nothing to address the
            // invite with, skip.
            return;
        };
        result.ids.push(id);
        result.names.push(name);
    };

    for &id in selected_friend_ids {
        consider(id, None);
    }
    for group in selected_groups {
        for (id, name) in group.members() {
            consider(id, Some(name));
        }
    }

    debug_assert_eq!(result.ids.len(), result.names.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn user(id: Uuid, name: &str, friends: &[Uuid], blocked: &[Uuid]) -> AppUser {
        AppUser {
            id,
            email: format!("{}@example.com", name.to_lowercase()),
            display_name: name.to_string(),
            photo_url: None,
            friend_ids: friends.iter().copied().collect(),
            blocked_user_ids: blocked.iter().copied().collect(),
            is_admin: false,
        }
    }

    fn group(members: Vec<(Uuid, &str)>) -> FriendGroup {
        FriendGroup::new(
            Uuid::new_v4(),
            "Ballers".to_string(),
            Uuid::new_v4(),
            members
                .into_iter()
                .map(|(id, n)| (id, n.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let sender = user(Uuid::new_v4(), "Sender", &[a, b], &[]);
        let candidates = vec![user(a, "Alex", &[], &[]), user(b, "Bo", &[], &[])];
        let groups = vec![group(vec![(a, "Alex"), (b, "Bo")])];

        let result = resolve_recipients(&sender, &[a], &groups, &candidates);

        assert_eq!(result.ids, vec![a, b]);
        assert_eq!(result.names, vec!["Alex".to_string(), "Bo".to_string()]);
    }

    #[test]
    fn test_sender_excluded_from_own_invite() {
        let a = Uuid::new_v4();
        let sender_id = Uuid::new_v4();
        let sender = user(sender_id, "Sender", &[a, sender_id], &[]);
        let groups = vec![group(vec![(sender_id, "Sender"), (a, "Alex")])];
        let candidates = vec![user(a, "Alex", &[], &[])];

        let result = resolve_recipients(&sender, &[], &groups, &candidates);

        assert_eq!(result.ids, vec![a]);
    }

    #[test]
    fn test_non_friends_excluded() {
        let friend = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let sender = user(Uuid::new_v4(), "Sender", &[friend], &[]);
        let groups = vec![group(vec![(friend, "Friend"), (stranger, "Stranger")])];

        let result = resolve_recipients(&sender, &[], &groups, &[]);

        assert_eq!(result.ids, vec![friend]);
        assert_eq!(result.names, vec!["Friend".to_string()]);
    }

    #[test]
    fn test_sender_block_excludes() {
        let b = Uuid::new_v4();
        let sender = user(Uuid::new_v4(), "Sender", &[b], &[b]);
        let groups = vec![group(vec![(b, "Bo")])];
        let candidates = vec![user(b, "Bo", &[], &[])];

        let result = resolve_recipients(&sender, &[b], &groups, &candidates);

        assert!(result.is_empty());
    }

    #[test]
    fn test_mutual_block_excludes_even_group_members() {
        // B blocked the sender; B is a friend and in a selected group,
        // but is still excluded.
        let b = Uuid::new_v4();
        let sender_id = Uuid::new_v4();
        let sender = user(sender_id, "Sender", &[b], &[]);
        let candidates = vec![user(b, "Bo", &[], &[sender_id])];
        let groups = vec![group(vec![(b, "Bo")])];

        let result = resolve_recipients(&sender, &[b], &groups, &candidates);

        assert!(result.is_empty());
    }

    #[test]
    fn test_group_name_fallback_when_no_record() {
        // Group member without a loaded candidate record keeps the name the
        // group carries for them.
        let c = Uuid::new_v4();
        let sender = user(Uuid::new_v4(), "Sender", &[c], &[]);
        let groups = vec![group(vec![(c, "Casey")])];

        let result = resolve_recipients(&sender, &[], &groups, &[]);

        assert_eq!(result.ids, vec![c]);
        assert_eq!(result.names, vec!["Casey".to_string()]);
    }

    #[test]
    fn test_deterministic_and_aligned() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let sender = user(Uuid::new_v4(), "Sender", &ids, &[ids[4]]);
        let candidates: Vec<AppUser> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| user(id, &format!("U{}", i), &[], &[]))
            .collect();
        let groups = vec![group(ids.iter().map(|&id| (id, "G")).collect())];

        let first = resolve_recipients(&sender, &ids[..2], &groups, &candidates);
        let second = resolve_recipients(&sender, &ids[..2], &groups, &candidates);

        assert_eq!(first, second);
        assert_eq!(first.ids.len(), first.names.len());
        let unique: HashSet<_> = first.ids.iter().collect();
        assert_eq!(unique.len(), first.ids.len());
    }
}
