//! Game repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::park::SportType;
use domain::models::Game;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GameEntity, GameParticipantEntity, SportTypeDb};
use crate::metrics::QueryTimer;

/// Repository for game and participant database operations.
#[derive(Clone)]
pub struct GameRepository {
    pool: PgPool,
}

impl GameRepository {
    /// Creates a new GameRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a game. The creator is added as the first participant.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_game(
        &self,
        name: &str,
        park_id: Uuid,
        court_id: Option<Uuid>,
        sport_type: SportType,
        scheduled_time: Option<DateTime<Utc>>,
        created_by: Uuid,
        creator_name: &str,
    ) -> Result<Game, sqlx::Error> {
        let timer = QueryTimer::new("create_game");
        let sport_db: SportTypeDb = sport_type.into();
        let mut tx = self.pool.begin().await?;

        let game = sqlx::query_as::<_, GameEntity>(
            r#"
            INSERT INTO games (name, park_id, court_id, sport_type, scheduled_time, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, park_id, court_id, sport_type, scheduled_time, created_by, created_at
            "#,
        )
        .bind(name)
        .bind(park_id)
        .bind(court_id)
        .bind(sport_db)
        .bind(scheduled_time)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO game_participants (game_id, user_id, display_name)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(game.id)
        .bind(created_by)
        .bind(creator_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(game.into())
    }

    /// Find a game by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, sqlx::Error> {
        let timer = QueryTimer::new("find_game_by_id");
        let entity = sqlx::query_as::<_, GameEntity>(
            r#"
            SELECT id, name, park_id, court_id, sport_type, scheduled_time, created_by, created_at
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();
        Ok(entity.map(Into::into))
    }

    /// Add a participant to a game. Joining a game you are already in is a
    /// no-op.
    pub async fn join_game(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("join_game");
        sqlx::query(
            r#"
            INSERT INTO game_participants (game_id, user_id, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (game_id, user_id) DO NOTHING
            "#,
        )
        .bind(game_id)
        .bind(user_id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// List participants of a game in join order.
    pub async fn list_participants(
        &self,
        game_id: Uuid,
    ) -> Result<Vec<GameParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_game_participants");
        let result = sqlx::query_as::<_, GameParticipantEntity>(
            r#"
            SELECT game_id, user_id, display_name, joined_at
            FROM game_participants
            WHERE game_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: GameRepository tests require database connection and are covered by integration tests
}
