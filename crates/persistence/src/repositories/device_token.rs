//! Device token repository for push notification targeting.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DeviceTokenEntity;
use crate::metrics::QueryTimer;

/// Repository for device token database operations.
#[derive(Clone)]
pub struct DeviceTokenRepository {
    pool: PgPool,
}

impl DeviceTokenRepository {
    /// Creates a new DeviceTokenRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register or refresh a device token for a user.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        token: &str,
        platform: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_device_token");
        sqlx::query(
            r#"
            INSERT INTO device_tokens (user_id, token, platform)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, token)
            DO UPDATE SET platform = EXCLUDED.platform, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(platform)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Remove a single device token.
    pub async fn delete(&self, user_id: Uuid, token: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_device_token");
        let result = sqlx::query(
            r#"
            DELETE FROM device_tokens
            WHERE user_id = $1 AND token = $2
            "#,
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Remove every token registered for a user.
    pub async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_all_device_tokens");
        let result = sqlx::query(
            r#"
            DELETE FROM device_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List tokens for a set of users, for fanning out a push notification.
    pub async fn list_for_users(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<DeviceTokenEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_device_tokens");
        let result = sqlx::query_as::<_, DeviceTokenEntity>(
            r#"
            SELECT user_id, token, platform, created_at, updated_at
            FROM device_tokens
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: DeviceTokenRepository tests require database connection and are covered by integration tests
}
