use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod actors;
pub mod doc;
pub mod extract;
pub mod genres;
pub mod health;
pub mod params;
pub mod performances;
pub mod plays;
pub mod reservations;
pub mod theatre_halls;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/actors", actors::router())
        .nest("/genres", genres::router())
        .nest("/plays", plays::router())
        .nest("/theatre-halls", theatre_halls::router())
        .nest("/performances", performances::router())
        .nest("/reservations", reservations::router())
}

/// The full application: health check, `/api` resources, docs and fallback.
/// Transport layers (tracing, limits, request ids) are added by the binary.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
