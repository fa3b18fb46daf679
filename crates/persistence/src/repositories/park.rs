//! Park repository for database operations.

use domain::models::park::{Park, ParkStatus, SportType};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CourtEntity, ParkEntity, ParkStatusDb, SportTypeDb};
use crate::metrics::QueryTimer;

/// Repository for park and court database operations.
#[derive(Clone)]
pub struct ParkRepository {
    pool: PgPool,
}

impl ParkRepository {
    /// Creates a new ParkRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a park submission with its courts. New parks start out pending
    /// until an admin approves them.
    pub async fn create_park(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        submitted_by: Uuid,
        courts: &[(i32, SportType)],
    ) -> Result<ParkEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_park");
        let mut tx = self.pool.begin().await?;

        let park = sqlx::query_as::<_, ParkEntity>(
            r#"
            INSERT INTO parks (name, latitude, longitude, status, submitted_by)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING id, name, latitude, longitude, status, submitted_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .bind(submitted_by)
        .fetch_one(&mut *tx)
        .await?;

        for (court_number, sport_type) in courts {
            let sport_db: SportTypeDb = (*sport_type).into();
            sqlx::query(
                r#"
                INSERT INTO courts (park_id, court_number, sport_type)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(park.id)
            .bind(court_number)
            .bind(sport_db)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(park)
    }

    /// Find a park by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ParkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_park_by_id");
        let result = sqlx::query_as::<_, ParkEntity>(
            r#"
            SELECT id, name, latitude, longitude, status, submitted_by, created_at, updated_at
            FROM parks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the courts of a park ordered by court number.
    pub async fn list_courts(&self, park_id: Uuid) -> Result<Vec<CourtEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_courts");
        let result = sqlx::query_as::<_, CourtEntity>(
            r#"
            SELECT id, park_id, court_number, sport_type
            FROM courts
            WHERE park_id = $1
            ORDER BY court_number
            "#,
        )
        .bind(park_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a single court by ID.
    pub async fn find_court(&self, court_id: Uuid) -> Result<Option<CourtEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_court");
        let result = sqlx::query_as::<_, CourtEntity>(
            r#"
            SELECT id, park_id, court_number, sport_type
            FROM courts
            WHERE id = $1
            "#,
        )
        .bind(court_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Load a park with its courts as a domain model.
    pub async fn load_park(&self, id: Uuid) -> Result<Option<Park>, sqlx::Error> {
        let Some(entity) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let courts = self.list_courts(id).await?;
        Ok(Some(entity.into_park(courts)))
    }

    /// List all approved parks with their courts.
    pub async fn list_approved(&self) -> Result<Vec<Park>, sqlx::Error> {
        self.list_by_status(ParkStatusDb::Approved).await
    }

    /// List all pending park submissions with their courts.
    pub async fn list_pending(&self) -> Result<Vec<Park>, sqlx::Error> {
        self.list_by_status(ParkStatusDb::Pending).await
    }

    async fn list_by_status(&self, status: ParkStatusDb) -> Result<Vec<Park>, sqlx::Error> {
        let timer = QueryTimer::new("list_parks_by_status");
        let entities = sqlx::query_as::<_, ParkEntity>(
            r#"
            SELECT id, name, latitude, longitude, status, submitted_by, created_at, updated_at
            FROM parks
            WHERE status = $1
            ORDER BY name
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        let mut parks = Vec::with_capacity(entities.len());
        for entity in entities {
            let courts = self.list_courts(entity.id).await?;
            parks.push(entity.into_park(courts));
        }
        timer.record();
        Ok(parks)
    }

    /// Update the moderation status of a park.
    pub async fn set_status(&self, id: Uuid, status: ParkStatus) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_park_status");
        let status_db: ParkStatusDb = status.into();
        let result = sqlx::query(
            r#"
            UPDATE parks
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status_db)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
