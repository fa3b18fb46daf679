//! Check-in repository for database operations.

use domain::models::CheckIn;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CheckInEntity;
use crate::metrics::QueryTimer;

/// Repository for check-in database operations.
#[derive(Clone)]
pub struct CheckInRepository {
    pool: PgPool,
}

impl CheckInRepository {
    /// Creates a new CheckInRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a check-in record.
    pub async fn create(&self, check_in: &CheckIn) -> Result<CheckIn, sqlx::Error> {
        let timer = QueryTimer::new("create_check_in");
        let entity = sqlx::query_as::<_, CheckInEntity>(
            r#"
            INSERT INTO check_ins (id, user_id, user_name, user_photo_url, park_id, park_name, court_number, player_count, check_in_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, user_name, user_photo_url, park_id, park_name, court_number, player_count, check_in_time, created_at, updated_at
            "#,
        )
        .bind(check_in.id)
        .bind(check_in.user_id)
        .bind(&check_in.user_name)
        .bind(&check_in.user_photo_url)
        .bind(check_in.park_id)
        .bind(&check_in.park_name)
        .bind(check_in.court_number)
        .bind(check_in.player_count)
        .bind(check_in.check_in_time)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(entity.into())
    }

    /// Find a check-in by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CheckIn>, sqlx::Error> {
        let timer = QueryTimer::new("find_check_in_by_id");
        let entity = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT id, user_id, user_name, user_photo_url, park_id, park_name, court_number, player_count, check_in_time, created_at, updated_at
            FROM check_ins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();
        Ok(entity.map(Into::into))
    }

    /// List the most recent check-ins at a park, newest first.
    pub async fn list_recent_for_park(
        &self,
        park_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CheckIn>, sqlx::Error> {
        let timer = QueryTimer::new("list_recent_check_ins");
        let entities = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT id, user_id, user_name, user_photo_url, park_id, park_name, court_number, player_count, check_in_time, created_at, updated_at
            FROM check_ins
            WHERE park_id = $1
            ORDER BY check_in_time DESC
            LIMIT $2
            "#,
        )
        .bind(park_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        Ok(entities.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    // Note: CheckInRepository tests require database connection and are covered by integration tests
}
