//! Postgres-backed implementations of the domain scan traits.
//!
//! The scan resolver only knows the [`GameService`], [`ParkService`] and
//! [`CheckInService`] traits; these adapters bridge them to the repository
//! layer and map storage errors into [`ScanError`].

use async_trait::async_trait;
use domain::models::{CheckIn, Game, Park};
use domain::services::{CheckInService, GameService, ParkService, ScanError};
use sqlx::PgPool;
use uuid::Uuid;

use persistence::repositories::{CheckInRepository, GameRepository, ParkRepository, QueueRepository};

fn store_error(err: sqlx::Error) -> ScanError {
    ScanError::Store(err.to_string())
}

/// Game lookups and membership over Postgres.
#[derive(Clone)]
pub struct PgGameService {
    games: GameRepository,
}

impl PgGameService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            games: GameRepository::new(pool),
        }
    }
}

#[async_trait]
impl GameService for PgGameService {
    async fn get_game(&self, id: Uuid) -> Result<Option<Game>, ScanError> {
        self.games.find_by_id(id).await.map_err(store_error)
    }

    async fn join_game(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), ScanError> {
        self.games
            .join_game(game_id, user_id, display_name)
            .await
            .map_err(|err| match &err {
                // A foreign key violation means the game vanished between
                // parse and join.
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
                    ScanError::GameNotFound
                }
                _ => store_error(err),
            })
    }
}

/// Park lookups and queue membership over Postgres.
#[derive(Clone)]
pub struct PgParkService {
    parks: ParkRepository,
    queues: QueueRepository,
}

impl PgParkService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            parks: ParkRepository::new(pool.clone()),
            queues: QueueRepository::new(pool),
        }
    }
}

#[async_trait]
impl ParkService for PgParkService {
    async fn get_park(&self, id: Uuid) -> Result<Option<Park>, ScanError> {
        self.parks.load_park(id).await.map_err(store_error)
    }

    async fn join_queue(
        &self,
        park_id: Uuid,
        court_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), ScanError> {
        self.queues
            .join(park_id, court_id, user_id, display_name)
            .await
            .map_err(store_error)
    }
}

/// Check-in persistence over Postgres.
#[derive(Clone)]
pub struct PgCheckInService {
    check_ins: CheckInRepository,
}

impl PgCheckInService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            check_ins: CheckInRepository::new(pool),
        }
    }
}

#[async_trait]
impl CheckInService for PgCheckInService {
    async fn create_check_in(&self, check_in: &CheckIn) -> Result<(), ScanError> {
        self.check_ins
            .create(check_in)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
