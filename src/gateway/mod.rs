//! HTTP and WebSocket gateway (axum).
//!
//! `/ws/{client_id}` speaks the JSON protocol in [`messages`]; every connection
//! gets its own task plus an outbound queue in the [`ConnectionRegistry`].
//! `/healthz` and `/ready` report liveness and ranking readiness.

pub mod error;
pub mod handler;
pub mod messages;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{close_connection, dispatch, handle_text, ws_handler};
pub use messages::{ClientMessage, Outbound, ServerMessage};
pub use state::{AppState, ConnectionRegistry};

use crate::learning::{LearningInsights, LearningStats};
use crate::scoring::RankingMode;

pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/ws/{client_id}", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_games: usize,
    pub waiting_players: usize,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub ranking_mode: RankingMode,
    pub vocabulary_size: usize,
    pub target_pool: usize,
    pub connections: usize,
    pub learning: LearningStats,
    pub insights: LearningInsights,
}

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            active_games: state.coordinator.active_games(),
            waiting_players: state.coordinator.waiting_players(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let engine = state.coordinator.engine();

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ok",
            ranking_mode: engine.mode(),
            vocabulary_size: engine.vocabulary().len(),
            target_pool: engine.target_pool_size(),
            connections: state.connections.len(),
            learning: engine.associations().stats(),
            insights: engine.associations().insights(),
        }),
    )
        .into_response()
}
