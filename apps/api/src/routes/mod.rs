pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/start", post(handlers::handle_start))
        .route("/api/chat", post(handlers::handle_chat))
        .route("/api/speak", post(handlers::handle_speak))
        .route("/api/report/:interview_id", get(handlers::handle_report))
        .with_state(state)
}
