//! Court queue repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::QueueEntryEntity;
use crate::metrics::QueryTimer;

/// Repository for court queue database operations.
#[derive(Clone)]
pub struct QueueRepository {
    pool: PgPool,
}

impl QueueRepository {
    /// Creates a new QueueRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Join the queue for a court. Joining a queue you are already in is a
    /// no-op.
    pub async fn join(
        &self,
        park_id: Uuid,
        court_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("join_queue");
        sqlx::query(
            r#"
            INSERT INTO queue_entries (park_id, court_id, user_id, display_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (court_id, user_id) DO NOTHING
            "#,
        )
        .bind(park_id)
        .bind(court_id)
        .bind(user_id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Leave the queue for a court.
    pub async fn leave(&self, court_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("leave_queue");
        let result = sqlx::query(
            r#"
            DELETE FROM queue_entries
            WHERE court_id = $1 AND user_id = $2
            "#,
        )
        .bind(court_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List the queue for a court in arrival order.
    pub async fn list_for_court(
        &self,
        court_id: Uuid,
    ) -> Result<Vec<QueueEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_queue_for_court");
        let result = sqlx::query_as::<_, QueueEntryEntity>(
            r#"
            SELECT id, park_id, court_id, user_id, display_name, joined_at
            FROM queue_entries
            WHERE court_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(court_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: QueueRepository tests require database connection and are covered by integration tests
}
