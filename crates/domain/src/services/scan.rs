//! Scan resolution: turns a QR payload into a check-in.
//!
//! One scan runs as a short flow: parse the payload, resolve the referenced
//! game/park/court, prompt the user for anything the payload left open
//! (sport category, court, player count), then persist the check-in and
//! optionally enroll the user in the court's live queue.
//!
//! External collaborators are injected as traits ([`GameService`],
//! [`ParkService`], [`CheckInService`], [`ScanPrompts`]) so tests substitute
//! fakes. Steps execute strictly in order: join before fetch, fetch before
//! prompt, prompt before persist. A per-user latch makes the flow
//! single-shot: while one scan is processing, further scans from the same
//! user are ignored rather than queued, which prevents duplicate check-ins
//! from rapid repeat scans of the same code.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CheckIn, Court, Game, Park, SportCategory};
use crate::services::qr::{self, CheckInParams, QrAction};

/// Error type for scan flows.
///
/// Every variant is recoverable at the flow level: the caller surfaces a
/// message, the latch is released, and the user may rescan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Game not found")]
    GameNotFound,

    #[error("Park not found")]
    ParkNotFound,

    #[error("This park has no courts")]
    NoCourtsInPark,

    #[error("Selected court is not available at this park")]
    InvalidCourtSelection,

    #[error("Storage operation failed: {0}")]
    Store(String),
}

/// Game lookups and membership.
#[async_trait]
pub trait GameService: Send + Sync {
    async fn get_game(&self, id: Uuid) -> Result<Option<Game>, ScanError>;

    /// Adds the user to the game. Idempotent: joining an already-joined game
    /// must leave exactly one membership and must not error.
    async fn join_game(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), ScanError>;
}

/// Park lookups and queue membership.
#[async_trait]
pub trait ParkService: Send + Sync {
    async fn get_park(&self, id: Uuid) -> Result<Option<Park>, ScanError>;

    async fn join_queue(
        &self,
        park_id: Uuid,
        court_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), ScanError>;
}

/// Check-in persistence.
#[async_trait]
pub trait CheckInService: Send + Sync {
    async fn create_check_in(&self, check_in: &CheckIn) -> Result<(), ScanError>;
}

/// Reply to a user-facing prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReply<T> {
    /// The user answered.
    Answer(T),
    /// The user dismissed the prompt; the flow aborts.
    Dismissed,
    /// No answer is available in this pass (request/response transports);
    /// the flow stops and reports which prompt is needed.
    Deferred,
}

/// User-facing prompts the resolver may need mid-flow.
///
/// Each call is a suspension point: the flow awaits the reply before
/// proceeding, exactly like a modal dialog in the client.
#[async_trait]
pub trait ScanPrompts: Send + Sync {
    async fn choose_sport_category(&self, options: &[SportCategory]) -> PromptReply<SportCategory>;

    async fn choose_court(&self, options: &[Court]) -> PromptReply<Uuid>;

    async fn choose_player_count(&self, default: i32) -> PromptReply<i32>;
}

/// Description of a prompt still needed to finish a deferred flow.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptRequest {
    SportCategory { options: Vec<SportCategory> },
    Court { options: Vec<Court> },
    PlayerCount { default: i32 },
}

/// Terminal result of one scan flow.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// Check-in created; `queued` reports whether the user was also enrolled
    /// in the court's live queue.
    CheckedIn { check_in: CheckIn, queued: bool },
    /// A prompt needs answering before the flow can complete.
    NeedsAnswer(PromptRequest),
    /// The payload did not match any recognized shape; no side effects.
    Unrecognized,
    /// The user dismissed a prompt; the rest of the flow was aborted.
    Cancelled,
    /// A scan for this user is already processing; this one was ignored.
    AlreadyScanning,
}

/// The user on whose behalf a scan runs.
#[derive(Debug, Clone)]
pub struct ScanUser {
    pub id: Uuid,
    pub display_name: String,
    pub photo_url: Option<String>,
}

/// Per-user single-shot latch.
///
/// Held for the duration of one scan flow; a second acquire for the same
/// user fails until the guard drops.
#[derive(Debug, Default)]
pub struct ScanLatch {
    active: Mutex<HashSet<Uuid>>,
}

impl ScanLatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self, user_id: Uuid) -> Option<ScanGuard<'_>> {
        let mut active = self.active.lock().expect("scan latch poisoned");
        if !active.insert(user_id) {
            return None;
        }
        Some(ScanGuard {
            latch: self,
            user_id,
        })
    }
}

struct ScanGuard<'a> {
    latch: &'a ScanLatch,
    user_id: Uuid,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.latch.active.lock().expect("scan latch poisoned");
        active.remove(&self.user_id);
    }
}

/// Resolves scanned payloads into check-ins.
#[derive(Clone)]
pub struct ScanResolver {
    games: Arc<dyn GameService>,
    parks: Arc<dyn ParkService>,
    check_ins: Arc<dyn CheckInService>,
    latch: Arc<ScanLatch>,
}

const DEFAULT_PLAYER_COUNT: i32 = 1;

impl ScanResolver {
    pub fn new(
        games: Arc<dyn GameService>,
        parks: Arc<dyn ParkService>,
        check_ins: Arc<dyn CheckInService>,
        latch: Arc<ScanLatch>,
    ) -> Self {
        Self {
            games,
            parks,
            check_ins,
            latch,
        }
    }

    /// Runs one scan flow for `user`.
    ///
    /// The latch is released on every exit path, including errors and
    /// deferred prompts.
    pub async fn process(
        &self,
        user: &ScanUser,
        payload: &str,
        prompts: &dyn ScanPrompts,
    ) -> Result<ScanOutcome, ScanError> {
        let Some(_guard) = self.latch.acquire(user.id) else {
            tracing::debug!(user_id = %user.id, "Scan ignored, another scan in progress");
            return Ok(ScanOutcome::AlreadyScanning);
        };

        match qr::parse(payload) {
            QrAction::Invite { game_id } => self.handle_invite(user, &game_id, prompts).await,
            QrAction::CheckIn(params) => self.handle_check_in(user, &params, prompts).await,
            QrAction::Unknown => {
                tracing::info!(user_id = %user.id, "Unrecognized scan payload");
                Ok(ScanOutcome::Unrecognized)
            }
        }
    }

    /// Invite payload: join the game, then check in at its court.
    async fn handle_invite(
        &self,
        user: &ScanUser,
        game_id: &str,
        prompts: &dyn ScanPrompts,
    ) -> Result<ScanOutcome, ScanError> {
        let game_id = parse_id(game_id).ok_or(ScanError::GameNotFound)?;

        // Join first; the membership write is idempotent so re-scanning an
        // invite for an already-joined game is harmless.
        self.games
            .join_game(game_id, user.id, &user.display_name)
            .await?;

        let game = self
            .games
            .get_game(game_id)
            .await?
            .ok_or(ScanError::GameNotFound)?;
        let park = self
            .parks
            .get_park(game.park_id)
            .await?
            .ok_or(ScanError::ParkNotFound)?;
        let court = resolve_court(&park, game.court_id)?.clone();

        let player_count = match prompts.choose_player_count(DEFAULT_PLAYER_COUNT).await {
            PromptReply::Answer(count) => count,
            PromptReply::Dismissed => return Ok(ScanOutcome::Cancelled),
            PromptReply::Deferred => {
                return Ok(ScanOutcome::NeedsAnswer(PromptRequest::PlayerCount {
                    default: DEFAULT_PLAYER_COUNT,
                }))
            }
        };

        let check_in = self
            .persist_check_in(user, &park, court.court_number, player_count)
            .await?;

        tracing::info!(
            user_id = %user.id,
            game_id = %game_id,
            park_id = %park.id,
            court_number = court.court_number,
            "Checked in via game invite"
        );
        Ok(ScanOutcome::CheckedIn {
            check_in,
            queued: false,
        })
    }

    /// Check-in payload: resolve the park and court, check in, and enroll in
    /// the court queue when a specific court was resolved.
    async fn handle_check_in(
        &self,
        user: &ScanUser,
        params: &CheckInParams,
        prompts: &dyn ScanPrompts,
    ) -> Result<ScanOutcome, ScanError> {
        // Resolve park + court from whichever reference the payload carries.
        // `auto_queue` is set whenever the payload pinned a specific court,
        // directly or via the game it names.
        let (park, court, auto_queue) = if let Some(raw) = &params.game_id {
            let game_id = parse_id(raw).ok_or(ScanError::GameNotFound)?;
            let game = self
                .games
                .get_game(game_id)
                .await?
                .ok_or(ScanError::GameNotFound)?;
            let park = self
                .parks
                .get_park(game.park_id)
                .await?
                .ok_or(ScanError::ParkNotFound)?;
            let court = resolve_court(&park, game.court_id)?.clone();
            (park, court, true)
        } else if let Some(raw) = &params.park_id {
            let park_id = parse_id(raw).ok_or(ScanError::ParkNotFound)?;
            let park = self
                .parks
                .get_park(park_id)
                .await?
                .ok_or(ScanError::ParkNotFound)?;

            if let Some(court_raw) = &params.court_id {
                // A stale court id on an old poster falls back to the park's
                // first court, same as the game path.
                let wanted = parse_id(court_raw);
                let court = resolve_court(&park, wanted)?.clone();
                (park, court, true)
            } else {
                match self.choose_court_interactively(&park, prompts).await? {
                    ChoiceResult::Chosen(court) => (park, court, true),
                    ChoiceResult::Stopped(outcome) => return Ok(outcome),
                }
            }
        } else {
            // Parser guarantees one of the two references is present.
            return Ok(ScanOutcome::Unrecognized);
        };

        // Explicit queue flag on the payload overrides the derived value.
        let join_queue = params.queue.unwrap_or(auto_queue);

        let player_count = match prompts.choose_player_count(DEFAULT_PLAYER_COUNT).await {
            PromptReply::Answer(count) => count,
            PromptReply::Dismissed => return Ok(ScanOutcome::Cancelled),
            PromptReply::Deferred => {
                return Ok(ScanOutcome::NeedsAnswer(PromptRequest::PlayerCount {
                    default: DEFAULT_PLAYER_COUNT,
                }))
            }
        };

        let check_in = self
            .persist_check_in(user, &park, court.court_number, player_count)
            .await?;

        if join_queue {
            self.parks
                .join_queue(park.id, court.id, user.id, &user.display_name)
                .await?;
        }

        tracing::info!(
            user_id = %user.id,
            park_id = %park.id,
            court_number = court.court_number,
            queued = join_queue,
            "Checked in via park code"
        );
        Ok(ScanOutcome::CheckedIn {
            check_in,
            queued: join_queue,
        })
    }

    /// Park-only payload: narrow down to one court via the sport category
    /// prompt, auto-selecting when only one court matches.
    async fn choose_court_interactively(
        &self,
        park: &Park,
        prompts: &dyn ScanPrompts,
    ) -> Result<ChoiceResult, ScanError> {
        if park.courts.is_empty() {
            return Err(ScanError::NoCourtsInPark);
        }

        let categories = park.sport_categories();
        let category = match prompts.choose_sport_category(&categories).await {
            PromptReply::Answer(category) if categories.contains(&category) => category,
            PromptReply::Answer(_) => return Err(ScanError::InvalidCourtSelection),
            PromptReply::Dismissed => return Ok(ChoiceResult::Stopped(ScanOutcome::Cancelled)),
            PromptReply::Deferred => {
                return Ok(ChoiceResult::Stopped(ScanOutcome::NeedsAnswer(
                    PromptRequest::SportCategory {
                        options: categories,
                    },
                )))
            }
        };

        let matching: Vec<Court> = park
            .courts_in_category(category)
            .into_iter()
            .cloned()
            .collect();
        if let [only] = matching.as_slice() {
            return Ok(ChoiceResult::Chosen(only.clone()));
        }

        match prompts.choose_court(&matching).await {
            PromptReply::Answer(court_id) => {
                let court = matching
                    .iter()
                    .find(|c| c.id == court_id)
                    .ok_or(ScanError::InvalidCourtSelection)?;
                Ok(ChoiceResult::Chosen(court.clone()))
            }
            PromptReply::Dismissed => Ok(ChoiceResult::Stopped(ScanOutcome::Cancelled)),
            PromptReply::Deferred => Ok(ChoiceResult::Stopped(ScanOutcome::NeedsAnswer(
                PromptRequest::Court { options: matching },
            ))),
        }
    }

    async fn persist_check_in(
        &self,
        user: &ScanUser,
        park: &Park,
        court_number: i32,
        player_count: i32,
    ) -> Result<CheckIn, ScanError> {
        let check_in = CheckIn::new(
            user.id,
            &user.display_name,
            user.photo_url.as_deref(),
            park,
            court_number,
            player_count,
        );
        self.check_ins.create_check_in(&check_in).await?;
        Ok(check_in)
    }
}

/// Result of the interactive court selection step.
enum ChoiceResult {
    Chosen(Court),
    Stopped(ScanOutcome),
}

/// Picks the referenced court, falling back to the park's first court when
/// the reference is stale or absent. Errors only when the park has no courts
/// at all.
fn resolve_court(park: &Park, wanted: Option<Uuid>) -> Result<&Court, ScanError> {
    let first = park.courts.first().ok_or(ScanError::NoCourtsInPark)?;
    Ok(wanted
        .and_then(|id| park.courts.iter().find(|c| c.id == id))
        .unwrap_or(first))
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParkStatus, SportType};
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    // -- fakes -----------------------------------------------------------

    #[derive(Default)]
    struct FakeGames {
        games: HashMap<Uuid, Game>,
        memberships: StdMutex<Vec<(Uuid, Uuid)>>,
    }

    #[async_trait]
    impl GameService for FakeGames {
        async fn get_game(&self, id: Uuid) -> Result<Option<Game>, ScanError> {
            Ok(self.games.get(&id).cloned())
        }

        async fn join_game(
            &self,
            game_id: Uuid,
            user_id: Uuid,
            _display_name: &str,
        ) -> Result<(), ScanError> {
            if !self.games.contains_key(&game_id) {
                return Err(ScanError::GameNotFound);
            }
            let mut memberships = self.memberships.lock().unwrap();
            if !memberships.contains(&(game_id, user_id)) {
                memberships.push((game_id, user_id));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeParks {
        parks: HashMap<Uuid, Park>,
        queue_joins: StdMutex<Vec<(Uuid, Uuid, Uuid)>>,
    }

    #[async_trait]
    impl ParkService for FakeParks {
        async fn get_park(&self, id: Uuid) -> Result<Option<Park>, ScanError> {
            Ok(self.parks.get(&id).cloned())
        }

        async fn join_queue(
            &self,
            park_id: Uuid,
            court_id: Uuid,
            user_id: Uuid,
            _display_name: &str,
        ) -> Result<(), ScanError> {
            self.queue_joins
                .lock()
                .unwrap()
                .push((park_id, court_id, user_id));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeCheckIns {
        created: StdMutex<Vec<CheckIn>>,
    }

    #[async_trait]
    impl CheckInService for FakeCheckIns {
        async fn create_check_in(&self, check_in: &CheckIn) -> Result<(), ScanError> {
            self.created.lock().unwrap().push(check_in.clone());
            Ok(())
        }
    }

    /// Prompt fake that answers from fixed replies.
    struct ScriptedPrompts {
        category: PromptReply<SportCategory>,
        court: PromptReply<Uuid>,
        player_count: PromptReply<i32>,
    }

    impl Default for ScriptedPrompts {
        fn default() -> Self {
            Self {
                category: PromptReply::Deferred,
                court: PromptReply::Deferred,
                player_count: PromptReply::Answer(1),
            }
        }
    }

    #[async_trait]
    impl ScanPrompts for ScriptedPrompts {
        async fn choose_sport_category(
            &self,
            _options: &[SportCategory],
        ) -> PromptReply<SportCategory> {
            self.category
        }

        async fn choose_court(&self, _options: &[Court]) -> PromptReply<Uuid> {
            self.court
        }

        async fn choose_player_count(&self, _default: i32) -> PromptReply<i32> {
            self.player_count
        }
    }

    // -- fixtures --------------------------------------------------------

    struct Fixture {
        games: Arc<FakeGames>,
        parks: Arc<FakeParks>,
        check_ins: Arc<FakeCheckIns>,
        latch: Arc<ScanLatch>,
        resolver: ScanResolver,
        user: ScanUser,
    }

    fn fixture(games: FakeGames, parks: FakeParks) -> Fixture {
        let games = Arc::new(games);
        let parks = Arc::new(parks);
        let check_ins = Arc::new(FakeCheckIns::default());
        let latch = Arc::new(ScanLatch::new());
        let resolver = ScanResolver::new(
            games.clone(),
            parks.clone(),
            check_ins.clone(),
            latch.clone(),
        );
        Fixture {
            games,
            parks,
            check_ins,
            latch,
            resolver,
            user: ScanUser {
                id: Uuid::new_v4(),
                display_name: "Jordan".to_string(),
                photo_url: None,
            },
        }
    }

    fn court(number: i32, sport: SportType) -> Court {
        Court {
            id: Uuid::new_v4(),
            court_number: number,
            sport_type: sport,
        }
    }

    fn park(courts: Vec<Court>) -> Park {
        Park {
            id: Uuid::new_v4(),
            name: "Riverside Park".to_string(),
            latitude: 37.77,
            longitude: -122.42,
            status: ParkStatus::Approved,
            courts,
        }
    }

    fn game(park: &Park, court_id: Option<Uuid>) -> Game {
        Game {
            id: Uuid::new_v4(),
            name: "Pickup".to_string(),
            park_id: park.id,
            court_id,
            sport_type: SportType::Basketball,
            scheduled_time: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    // -- tests -----------------------------------------------------------

    #[tokio::test]
    async fn test_invite_scan_joins_and_checks_in() {
        // ?gameId=g1 at a park with one court, count answered as 2 ->
        // check-in at court 1 with player_count 2.
        let p = park(vec![court(1, SportType::Basketball)]);
        let g = game(&p, Some(p.courts[0].id));
        let mut games = FakeGames::default();
        games.games.insert(g.id, g.clone());
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(games, parks);

        let prompts = ScriptedPrompts {
            player_count: PromptReply::Answer(2),
            ..Default::default()
        };
        let payload = format!("?gameId={}", g.id);
        let outcome = fx.resolver.process(&fx.user, &payload, &prompts).await.unwrap();

        let ScanOutcome::CheckedIn { check_in, queued } = outcome else {
            panic!("expected check-in");
        };
        assert!(!queued);
        assert_eq!(check_in.park_id, p.id);
        assert_eq!(check_in.court_number, 1);
        assert_eq!(check_in.player_count, 2);
        assert_eq!(
            fx.games.memberships.lock().unwrap().as_slice(),
            &[(g.id, fx.user.id)]
        );
        assert_eq!(fx.check_ins.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejoining_game_keeps_single_membership() {
        let p = park(vec![court(1, SportType::Basketball)]);
        let g = game(&p, Some(p.courts[0].id));
        let mut games = FakeGames::default();
        games.games.insert(g.id, g.clone());
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(games, parks);

        let prompts = ScriptedPrompts::default();
        let payload = format!("?gameId={}", g.id);
        for _ in 0..2 {
            fx.resolver.process(&fx.user, &payload, &prompts).await.unwrap();
        }

        assert_eq!(fx.games.memberships.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_court_falls_back_to_first() {
        let p = park(vec![
            court(1, SportType::Basketball),
            court(2, SportType::Basketball),
        ]);
        let g = game(&p, Some(Uuid::new_v4())); // court id not in the park
        let mut games = FakeGames::default();
        games.games.insert(g.id, g.clone());
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(games, parks);

        let outcome = fx
            .resolver
            .process(
                &fx.user,
                &format!("?gameId={}", g.id),
                &ScriptedPrompts::default(),
            )
            .await
            .unwrap();

        let ScanOutcome::CheckedIn { check_in, .. } = outcome else {
            panic!("expected check-in");
        };
        assert_eq!(check_in.court_number, 1);
    }

    #[tokio::test]
    async fn test_empty_park_fails_without_side_effects() {
        let p = park(vec![]);
        let g = game(&p, None);
        let mut games = FakeGames::default();
        games.games.insert(g.id, g.clone());
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(games, parks);

        let result = fx
            .resolver
            .process(
                &fx.user,
                &format!("?gameId={}", g.id),
                &ScriptedPrompts::default(),
            )
            .await;

        assert!(matches!(result, Err(ScanError::NoCourtsInPark)));
        assert!(fx.check_ins.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_game_reports_not_found() {
        let fx = fixture(FakeGames::default(), FakeParks::default());

        let result = fx
            .resolver
            .process(
                &fx.user,
                &format!("?gameId={}", Uuid::new_v4()),
                &ScriptedPrompts::default(),
            )
            .await;

        assert!(matches!(result, Err(ScanError::GameNotFound)));
    }

    #[tokio::test]
    async fn test_player_count_prompt_answers_are_clamped() {
        let p = park(vec![court(1, SportType::Basketball)]);
        let g = game(&p, Some(p.courts[0].id));
        let mut games = FakeGames::default();
        games.games.insert(g.id, g.clone());
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(games, parks);

        let prompts = ScriptedPrompts {
            player_count: PromptReply::Answer(42),
            ..Default::default()
        };
        let outcome = fx
            .resolver
            .process(&fx.user, &format!("?gameId={}", g.id), &prompts)
            .await
            .unwrap();

        let ScanOutcome::CheckedIn { check_in, .. } = outcome else {
            panic!("expected check-in");
        };
        assert_eq!(check_in.player_count, 10);
    }

    #[tokio::test]
    async fn test_direct_court_payload_auto_queues() {
        let p = park(vec![
            court(1, SportType::Basketball),
            court(2, SportType::Basketball),
        ]);
        let target = p.courts[1].clone();
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let payload = format!("courthub://checkin?parkId={}&courtId={}", p.id, target.id);
        let outcome = fx
            .resolver
            .process(&fx.user, &payload, &ScriptedPrompts::default())
            .await
            .unwrap();

        let ScanOutcome::CheckedIn { check_in, queued } = outcome else {
            panic!("expected check-in");
        };
        assert!(queued);
        assert_eq!(check_in.court_number, 2);
        assert_eq!(
            fx.parks.queue_joins.lock().unwrap().as_slice(),
            &[(p.id, target.id, fx.user.id)]
        );
    }

    #[tokio::test]
    async fn test_queue_false_overrides_auto_queue() {
        let p = park(vec![court(1, SportType::Basketball)]);
        let target = p.courts[0].clone();
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let payload = format!(
            "courthub://checkin?parkId={}&courtId={}&queue=false",
            p.id, target.id
        );
        let outcome = fx
            .resolver
            .process(&fx.user, &payload, &ScriptedPrompts::default())
            .await
            .unwrap();

        let ScanOutcome::CheckedIn { queued, .. } = outcome else {
            panic!("expected check-in");
        };
        assert!(!queued);
        assert!(fx.parks.queue_joins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_park_only_single_category_single_court_auto_selects() {
        let p = park(vec![court(1, SportType::Basketball)]);
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let prompts = ScriptedPrompts {
            category: PromptReply::Answer(SportCategory::Basketball),
            ..Default::default()
        };
        let payload = format!("courthub://checkin?parkId={}", p.id);
        let outcome = fx.resolver.process(&fx.user, &payload, &prompts).await.unwrap();

        let ScanOutcome::CheckedIn { check_in, queued } = outcome else {
            panic!("expected check-in");
        };
        assert!(queued, "category+selection path enrolls in the queue");
        assert_eq!(check_in.court_number, 1);
    }

    #[tokio::test]
    async fn test_park_only_multiple_courts_prompts_for_court() {
        let p = park(vec![
            court(1, SportType::TennisSingles),
            court(2, SportType::TennisDoubles),
        ]);
        let chosen = p.courts[1].clone();
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let prompts = ScriptedPrompts {
            category: PromptReply::Answer(SportCategory::Tennis),
            court: PromptReply::Answer(chosen.id),
            ..Default::default()
        };
        let payload = format!("courthub://checkin?parkId={}", p.id);
        let outcome = fx.resolver.process(&fx.user, &payload, &prompts).await.unwrap();

        let ScanOutcome::CheckedIn { check_in, queued } = outcome else {
            panic!("expected check-in");
        };
        assert!(queued);
        assert_eq!(check_in.court_number, 2);
    }

    #[tokio::test]
    async fn test_court_answer_outside_options_is_rejected() {
        let p = park(vec![
            court(1, SportType::Basketball),
            court(2, SportType::Basketball),
        ]);
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let prompts = ScriptedPrompts {
            category: PromptReply::Answer(SportCategory::Basketball),
            court: PromptReply::Answer(Uuid::new_v4()),
            ..Default::default()
        };
        let payload = format!("courthub://checkin?parkId={}", p.id);
        let result = fx.resolver.process(&fx.user, &payload, &prompts).await;

        assert!(matches!(result, Err(ScanError::InvalidCourtSelection)));
        assert!(fx.check_ins.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dismissed_prompt_cancels_without_persisting() {
        let p = park(vec![
            court(1, SportType::Basketball),
            court(2, SportType::TennisSingles),
        ]);
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let prompts = ScriptedPrompts {
            category: PromptReply::Dismissed,
            ..Default::default()
        };
        let payload = format!("courthub://checkin?parkId={}", p.id);
        let outcome = fx.resolver.process(&fx.user, &payload, &prompts).await.unwrap();

        assert!(matches!(outcome, ScanOutcome::Cancelled));
        assert!(fx.check_ins.created.lock().unwrap().is_empty());
        assert!(fx.parks.queue_joins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deferred_prompt_reports_needed_answer() {
        let p = park(vec![
            court(1, SportType::Basketball),
            court(2, SportType::TennisSingles),
        ]);
        let mut parks = FakeParks::default();
        parks.parks.insert(p.id, p.clone());
        let fx = fixture(FakeGames::default(), parks);

        let payload = format!("courthub://checkin?parkId={}", p.id);
        let outcome = fx
            .resolver
            .process(&fx.user, &payload, &ScriptedPrompts::default())
            .await
            .unwrap();

        let ScanOutcome::NeedsAnswer(PromptRequest::SportCategory { options }) = outcome else {
            panic!("expected sport category prompt");
        };
        assert_eq!(
            options,
            vec![SportCategory::Basketball, SportCategory::Tennis]
        );
    }

    #[tokio::test]
    async fn test_unrecognized_payload_has_no_side_effects() {
        let fx = fixture(FakeGames::default(), FakeParks::default());

        let outcome = fx
            .resolver
            .process(&fx.user, "not a courthub code", &ScriptedPrompts::default())
            .await
            .unwrap();

        assert!(matches!(outcome, ScanOutcome::Unrecognized));
        assert!(fx.check_ins.created.lock().unwrap().is_empty());
        assert!(fx.games.memberships.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latch_ignores_concurrent_scan_for_same_user() {
        let fx = fixture(FakeGames::default(), FakeParks::default());

        // Hold the latch as an in-flight scan would.
        let _guard = fx.latch.acquire(fx.user.id).unwrap();

        let outcome = fx
            .resolver
            .process(&fx.user, "?gameId=whatever", &ScriptedPrompts::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ScanOutcome::AlreadyScanning));

        // Another user is unaffected.
        let other = ScanUser {
            id: Uuid::new_v4(),
            display_name: "Casey".to_string(),
            photo_url: None,
        };
        let outcome = fx
            .resolver
            .process(&other, "nonsense", &ScriptedPrompts::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ScanOutcome::Unrecognized));
    }

    #[tokio::test]
    async fn test_latch_releases_after_failure() {
        let fx = fixture(FakeGames::default(), FakeParks::default());

        let payload = format!("?gameId={}", Uuid::new_v4());
        let first = fx
            .resolver
            .process(&fx.user, &payload, &ScriptedPrompts::default())
            .await;
        assert!(first.is_err());

        // The failed flow released the latch; the retry is processed.
        let second = fx
            .resolver
            .process(&fx.user, &payload, &ScriptedPrompts::default())
            .await;
        assert!(matches!(second, Err(ScanError::GameNotFound)));
    }
}
