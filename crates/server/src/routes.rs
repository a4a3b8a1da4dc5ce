use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod appointments;
pub mod cars;
pub mod documents;
pub mod mechanics;
pub mod services;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn welcome() -> Json<Value> {
    Json(json!({"message": "Welcome to Car Service API"}))
}

/// Resource routes without shared layers; served at the root and under `/api/v1`.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(mechanics::routes())
        .merge(cars::routes())
        .merge(services::routes())
        .merge(documents::routes(max_upload_bytes))
        .merge(appointments::routes())
}

/// Build the full application router: resources, docs, health, CORS and tracing.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = api_routes(state.max_upload_bytes);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .merge(api.clone())
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
