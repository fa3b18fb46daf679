//! User repository for database operations.

use domain::models::AppUser;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new user account.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        photo_url: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, password_hash, display_name, photo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, display_name, photo_url, is_admin, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(photo_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, display_name, photo_url, is_admin, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, display_name, photo_url, is_admin, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a user account. Friendships, blocks, memberships and tokens
    /// cascade.
    pub async fn delete_user(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Add a friendship edge. Idempotent.
    pub async fn add_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("add_friend");
        sqlx::query(
            r#"
            INSERT INTO friendships (user_id, friend_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, friend_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Remove a friendship edge.
    pub async fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_friend");
        let result = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE user_id = $1 AND friend_id = $2
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Block another user. Idempotent. Blocking also removes any friendship
    /// in both directions.
    pub async fn add_block(&self, user_id: Uuid, blocked_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("add_block");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO blocks (user_id, blocked_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, blocked_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(blocked_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE (user_id = $1 AND friend_id = $2)
               OR (user_id = $2 AND friend_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(blocked_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    /// Remove a block edge.
    pub async fn remove_block(&self, user_id: Uuid, blocked_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_block");
        let result = sqlx::query(
            r#"
            DELETE FROM blocks
            WHERE user_id = $1 AND blocked_id = $2
            "#,
        )
        .bind(user_id)
        .bind(blocked_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List friend IDs for a user.
    pub async fn list_friend_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_friend_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT friend_id
            FROM friendships
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List IDs of users this user has blocked.
    pub async fn list_blocked_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_blocked_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT blocked_id
            FROM blocks
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Load a user with their friendship and block edges as a domain model.
    pub async fn load_app_user(&self, id: Uuid) -> Result<Option<AppUser>, sqlx::Error> {
        let Some(entity) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let friend_ids = self.list_friend_ids(id).await?;
        let blocked_ids = self.list_blocked_ids(id).await?;
        Ok(Some(entity.into_app_user(friend_ids, blocked_ids)))
    }

    /// Load several users with their edges. Users missing from the database
    /// are skipped.
    pub async fn load_app_users(&self, ids: &[Uuid]) -> Result<Vec<AppUser>, sqlx::Error> {
        let timer = QueryTimer::new("load_app_users");
        let entities = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, display_name, photo_url, is_admin, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut users = Vec::with_capacity(entities.len());
        for entity in entities {
            let friend_ids = self.list_friend_ids(entity.id).await?;
            let blocked_ids = self.list_blocked_ids(entity.id).await?;
            users.push(entity.into_app_user(friend_ids, blocked_ids));
        }
        timer.record();
        Ok(users)
    }
}
