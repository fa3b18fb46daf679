//! Park discovery, submission, and moderation routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::park::{Park, ParkStatus, SportType};
use geo::{point, HaversineDistance};
use persistence::repositories::{CheckInRepository, ParkRepository, QueueRepository, UserRepository};
use serde::{Deserialize, Serialize};
use shared::validation::{validate_latitude, validate_longitude, validate_name, validate_radius_miles};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

const METERS_PER_MILE: f64 = 1609.344;

/// Request body for submitting a park.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "validate_longitude"))]
    pub longitude: f64,

    #[validate(length(min = 1, message = "A park needs at least one court"))]
    pub courts: Vec<CreateCourtRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourtRequest {
    pub court_number: i32,
    pub sport_type: SportType,
}

/// Query parameters for nearby-park search.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    #[validate(custom(function = "validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "validate_longitude"))]
    pub longitude: f64,

    /// Search radius in miles.
    #[validate(custom(function = "validate_radius_miles"))]
    pub radius_miles: f64,
}

/// A park with its courts in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkResponse {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ParkStatus,
    pub courts: Vec<CourtResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtResponse {
    pub id: Uuid,
    pub court_number: i32,
    pub sport_type: SportType,
    pub display_name: String,
}

/// A park with its distance from the search point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParkResponse {
    #[serde(flatten)]
    pub park: ParkResponse,
    pub distance_miles: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkListResponse {
    pub data: Vec<ParkResponse>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParkListResponse {
    pub data: Vec<NearbyParkResponse>,
    pub count: usize,
}

/// A recent check-in at a park.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub id: Uuid,
    pub user_name: String,
    pub user_photo_url: Option<String>,
    pub court_number: i32,
    pub player_count: i32,
    pub check_in_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInListResponse {
    pub data: Vec<CheckInResponse>,
    pub count: usize,
}

fn park_response(park: Park) -> ParkResponse {
    let courts: Vec<CourtResponse> = park
        .courts
        .iter()
        .map(|c| CourtResponse {
            id: c.id,
            court_number: c.court_number,
            sport_type: c.sport_type,
            display_name: c.display_name(),
        })
        .collect();
    ParkResponse {
        id: park.id,
        name: park.name,
        latitude: park.latitude,
        longitude: park.longitude,
        status: park.status,
        courts,
    }
}

async fn require_admin(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

/// Submit a new park for moderation.
///
/// POST /api/v1/parks
///
/// Submissions start pending and only appear in searches once approved.
pub async fn create_park(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateParkRequest>,
) -> Result<(StatusCode, Json<ParkResponse>), ApiError> {
    request.validate()?;

    let courts: Vec<(i32, SportType)> = request
        .courts
        .iter()
        .map(|c| (c.court_number, c.sport_type))
        .collect();

    let repo = ParkRepository::new(state.pool.clone());
    let entity = repo
        .create_park(
            request.name.trim(),
            request.latitude,
            request.longitude,
            user_auth.user_id,
            &courts,
        )
        .await?;
    let court_entities = repo.list_courts(entity.id).await?;
    let park = entity.into_park(court_entities);

    info!(
        park_id = %park.id,
        submitted_by = %user_auth.user_id,
        "Park submitted for moderation"
    );

    Ok((StatusCode::CREATED, Json(park_response(park))))
}

/// Get a park with its courts.
///
/// GET /api/v1/parks/:park_id
pub async fn get_park(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(park_id): Path<Uuid>,
) -> Result<Json<ParkResponse>, ApiError> {
    let repo = ParkRepository::new(state.pool.clone());
    let park = repo
        .load_park(park_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Park not found".to_string()))?;

    Ok(Json(park_response(park)))
}

/// Find approved parks near a point.
///
/// GET /api/v1/parks/nearby?latitude=..&longitude=..&radiusMiles=..
///
/// Results are sorted by distance, nearest first.
pub async fn nearby_parks(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyParkListResponse>, ApiError> {
    query.validate()?;

    let radius = query
        .radius_miles
        .min(state.config.limits.max_search_radius_miles);
    let origin = point!(x: query.longitude, y: query.latitude);

    let repo = ParkRepository::new(state.pool.clone());
    let parks = repo.list_approved().await?;

    let mut nearby: Vec<NearbyParkResponse> = parks
        .into_iter()
        .filter_map(|park| {
            let location = point!(x: park.longitude, y: park.latitude);
            let distance_miles = origin.haversine_distance(&location) / METERS_PER_MILE;
            (distance_miles <= radius).then(|| NearbyParkResponse {
                park: park_response(park),
                distance_miles,
            })
        })
        .collect();
    nearby.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));

    let count = nearby.len();
    Ok(Json(NearbyParkListResponse {
        data: nearby,
        count,
    }))
}

/// List recent check-ins at a park, newest first.
///
/// GET /api/v1/parks/:park_id/check-ins
pub async fn recent_check_ins(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(park_id): Path<Uuid>,
) -> Result<Json<CheckInListResponse>, ApiError> {
    let parks = ParkRepository::new(state.pool.clone());
    if parks.find_by_id(park_id).await?.is_none() {
        return Err(ApiError::NotFound("Park not found".to_string()));
    }

    let repo = CheckInRepository::new(state.pool.clone());
    let check_ins = repo
        .list_recent_for_park(park_id, state.config.limits.recent_check_ins)
        .await?;

    let data: Vec<CheckInResponse> = check_ins
        .into_iter()
        .map(|c| CheckInResponse {
            id: c.id,
            user_name: c.user_name,
            user_photo_url: c.user_photo_url,
            court_number: c.court_number,
            player_count: c.player_count,
            check_in_time: c.check_in_time,
        })
        .collect();
    let count = data.len();

    Ok(Json(CheckInListResponse { data, count }))
}

/// Join the live queue for a court.
///
/// POST /api/v1/parks/:park_id/courts/:court_id/queue
pub async fn join_queue(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((park_id, court_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let parks = ParkRepository::new(state.pool.clone());
    let court = parks
        .find_court(court_id)
        .await?
        .filter(|c| c.park_id == park_id)
        .ok_or_else(|| ApiError::NotFound("Court not found".to_string()))?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    let queues = QueueRepository::new(state.pool.clone());
    queues
        .join(park_id, court.id, user.id, &user.display_name)
        .await?;

    info!(
        user_id = %user.id,
        court_id = %court.id,
        "Joined court queue"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// List pending park submissions.
///
/// GET /api/v1/admin/parks/pending
pub async fn pending_parks(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ParkListResponse>, ApiError> {
    require_admin(&state, user_auth.user_id).await?;

    let repo = ParkRepository::new(state.pool.clone());
    let parks = repo.list_pending().await?;

    let data: Vec<ParkResponse> = parks.into_iter().map(park_response).collect();
    let count = data.len();

    Ok(Json(ParkListResponse { data, count }))
}

/// Approve a pending park.
///
/// POST /api/v1/admin/parks/:park_id/approve
pub async fn approve_park(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(park_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, user_auth.user_id).await?;
    set_park_status(&state, park_id, ParkStatus::Approved).await?;

    info!(park_id = %park_id, admin_id = %user_auth.user_id, "Park approved");
    Ok(StatusCode::NO_CONTENT)
}

/// Deny a pending park.
///
/// POST /api/v1/admin/parks/:park_id/deny
pub async fn deny_park(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(park_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, user_auth.user_id).await?;
    set_park_status(&state, park_id, ParkStatus::Denied).await?;

    info!(park_id = %park_id, admin_id = %user_auth.user_id, "Park denied");
    Ok(StatusCode::NO_CONTENT)
}

async fn set_park_status(
    state: &AppState,
    park_id: Uuid,
    status: ParkStatus,
) -> Result<(), ApiError> {
    let repo = ParkRepository::new(state.pool.clone());
    let updated = repo.set_status(park_id, status).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Park not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_park_request_needs_courts() {
        let request = CreateParkRequest {
            name: "Riverside Park".to_string(),
            latitude: 37.77,
            longitude: -122.42,
            courts: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_park_request_valid() {
        let request = CreateParkRequest {
            name: "Riverside Park".to_string(),
            latitude: 37.77,
            longitude: -122.42,
            courts: vec![CreateCourtRequest {
                court_number: 1,
                sport_type: SportType::Basketball,
            }],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_nearby_query_rejects_bad_latitude() {
        let query = NearbyQuery {
            latitude: 91.0,
            longitude: 0.0,
            radius_miles: 10.0,
        };
        assert!(query.validate().is_err());
    }
}
