//! Router construction, including the full middleware stack.
//!
//! Built in one place so integration tests exercise exactly the layers
//! production runs with.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::handlers::{assets, dashboard, health, maintenance, reports, schedule};
use crate::state::AppState;

/// Build the CORS layer from configured origins.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

/// Build the application router with all routes and middleware layers.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health::health_check))
        // Asset registry.
        .route("/assets", post(assets::create_asset).get(assets::list_assets))
        .route("/assets/{id}", get(assets::get_asset))
        .route("/assets/{id}/return", post(maintenance::return_to_service))
        // Lifecycle operations.
        .route("/maintenance", post(maintenance::open_maintenance))
        .route("/maintenance/{id}/close", post(maintenance::close_maintenance))
        .route("/maintenance/{id}/notes", post(maintenance::append_notes))
        // Scheduling estimator.
        .route("/schedule/upcoming", get(schedule::upcoming_maintenance))
        // Dashboard aggregates (cached).
        .route("/dashboard/monthly-trend", get(dashboard::monthly_trend))
        .route(
            "/dashboard/category-breakdown",
            get(dashboard::category_breakdown),
        )
        .route(
            "/dashboard/cache/invalidate",
            post(dashboard::invalidate_cache),
        )
        // Report/export aggregates (always fresh).
        .route("/reports/monthly-trend", get(reports::monthly_trend))
        .route(
            "/reports/category-breakdown",
            get(reports::category_breakdown),
        )
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
