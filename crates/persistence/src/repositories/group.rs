//! Friend group repository for database operations.

use domain::models::FriendGroup;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FriendGroupEntity, GroupMemberEntity};
use crate::metrics::QueryTimer;

/// Repository for friend group database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a group with its member list atomically. Member order is
    /// preserved via the position column.
    pub async fn create_group(
        &self,
        name: &str,
        owner_id: Uuid,
        members: &[(Uuid, String)],
    ) -> Result<FriendGroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, FriendGroupEntity>(
            r#"
            INSERT INTO friend_groups (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at
            "#,
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        for (position, (member_id, member_name)) in members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO friend_group_members (group_id, member_id, member_name, position)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (group_id, member_id) DO NOTHING
                "#,
            )
            .bind(group.id)
            .bind(member_id)
            .bind(member_name)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(group)
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FriendGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, FriendGroupEntity>(
            r#"
            SELECT id, name, owner_id, created_at
            FROM friend_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List members of a group in their stored order.
    pub async fn list_members(&self, group_id: Uuid) -> Result<Vec<GroupMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_members");
        let result = sqlx::query_as::<_, GroupMemberEntity>(
            r#"
            SELECT group_id, member_id, member_name, position
            FROM friend_group_members
            WHERE group_id = $1
            ORDER BY position
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Load a group with its members as a domain model.
    pub async fn load_group(&self, id: Uuid) -> Result<Option<FriendGroup>, sqlx::Error> {
        let Some(entity) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let members = self.list_members(id).await?;
        Ok(Some(entity.into_group(members)))
    }

    /// Load all groups owned by a user, newest first.
    pub async fn load_user_groups(&self, owner_id: Uuid) -> Result<Vec<FriendGroup>, sqlx::Error> {
        let timer = QueryTimer::new("load_user_groups");
        let entities = sqlx::query_as::<_, FriendGroupEntity>(
            r#"
            SELECT id, name, owner_id, created_at
            FROM friend_groups
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut groups = Vec::with_capacity(entities.len());
        for entity in entities {
            let members = self.list_members(entity.id).await?;
            groups.push(entity.into_group(members));
        }
        timer.record();
        Ok(groups)
    }

    /// Load a set of groups by ID, restricted to a single owner. IDs that do
    /// not match are skipped; the returned order follows the requested IDs.
    pub async fn load_groups_by_ids(
        &self,
        owner_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<FriendGroup>, sqlx::Error> {
        let timer = QueryTimer::new("load_groups_by_ids");
        let entities = sqlx::query_as::<_, FriendGroupEntity>(
            r#"
            SELECT id, name, owner_id, created_at
            FROM friend_groups
            WHERE owner_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut groups = Vec::with_capacity(entities.len());
        for wanted in ids {
            let Some(entity) = entities.iter().find(|e| e.id == *wanted) else {
                continue;
            };
            let members = self.list_members(entity.id).await?;
            groups.push(entity.clone().into_group(members));
        }
        timer.record();
        Ok(groups)
    }

    /// Delete a group owned by the given user. Members cascade.
    pub async fn delete_group(&self, id: Uuid, owner_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query(
            r#"
            DELETE FROM friend_groups
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: GroupRepository tests require database connection and are covered by integration tests
}
