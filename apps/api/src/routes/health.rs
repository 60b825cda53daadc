use axum::Json;
use serde_json::{json, Value};

use crate::interview::{INTERVIEW_DURATION_MINUTES, QUESTION_BUDGET};

/// GET /health
/// Returns service status plus the interview limits clients display.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interviewer-api",
        "question_budget": QUESTION_BUDGET,
        "interview_duration_minutes": INTERVIEW_DURATION_MINUTES
    }))
}
