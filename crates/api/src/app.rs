use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{MockNotificationService, NotificationService, ScanLatch, ScanResolver};
use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{auth, games, groups, health, invites, notifications, parks, scan, users};
use crate::services::{
    FcmNotificationService, PgCheckInService, PgGameService, PgParkService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
    pub notifier: Arc<dyn NotificationService>,
    pub resolver: ScanResolver,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let jwt = config.jwt.to_jwt_config();

    // Push notifications fall back to the logging mock when FCM is disabled.
    let notifier: Arc<dyn NotificationService> =
        match FcmNotificationService::new(config.fcm.clone()) {
            Ok(service) => Arc::new(service),
            Err(_) => Arc::new(MockNotificationService::new()),
        };

    let resolver = ScanResolver::new(
        Arc::new(PgGameService::new(pool.clone())),
        Arc::new(PgParkService::new(pool.clone())),
        Arc::new(PgCheckInService::new(pool.clone())),
        Arc::new(ScanLatch::new()),
    );

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        notifier,
        resolver,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh));

    // Authenticated routes (Bearer JWT via the UserAuth extractor)
    let protected_routes = Router::new()
        // Account
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/signout", post(auth::signout))
        .route("/api/v1/auth/account", delete(auth::delete_account))
        // Social graph
        .route("/api/v1/users/:user_id", get(users::get_user))
        .route("/api/v1/friends", get(users::list_friends))
        .route("/api/v1/friends/:user_id", post(users::add_friend))
        .route("/api/v1/friends/:user_id", delete(users::remove_friend))
        .route("/api/v1/users/:user_id/block", post(users::block_user))
        .route("/api/v1/users/:user_id/block", delete(users::unblock_user))
        // Friend groups
        .route("/api/v1/groups", get(groups::list_groups))
        .route("/api/v1/groups", post(groups::create_group))
        .route("/api/v1/groups/:group_id", delete(groups::delete_group))
        // Parks and courts
        .route("/api/v1/parks", post(parks::create_park))
        .route("/api/v1/parks/nearby", get(parks::nearby_parks))
        .route("/api/v1/parks/:park_id", get(parks::get_park))
        .route("/api/v1/parks/:park_id/check-ins", get(parks::recent_check_ins))
        .route(
            "/api/v1/parks/:park_id/courts/:court_id/queue",
            post(parks::join_queue),
        )
        .route("/api/v1/admin/parks/pending", get(parks::pending_parks))
        .route(
            "/api/v1/admin/parks/:park_id/approve",
            post(parks::approve_park),
        )
        .route("/api/v1/admin/parks/:park_id/deny", post(parks::deny_park))
        // Games
        .route("/api/v1/games", post(games::create_game))
        .route("/api/v1/games/:game_id", get(games::get_game))
        .route("/api/v1/games/:game_id/join", post(games::join_game))
        // Scanning
        .route("/api/v1/scan", post(scan::process_scan))
        // Invites
        .route("/api/v1/games/:game_id/invites", post(invites::send_invites))
        .route("/api/v1/invites", get(invites::list_invites))
        // Push tokens
        .route(
            "/api/v1/notifications/token",
            put(notifications::register_token),
        )
        .route(
            "/api/v1/notifications/token",
            delete(notifications::remove_token),
        );

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
