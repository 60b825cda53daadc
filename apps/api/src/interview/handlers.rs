//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::interview::report::{export_report, report_filename};
use crate::interview::session::{continue_interview, start_interview, TurnOutcome};
use crate::models::interview::InterviewId;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub name: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub interview_id: InterviewId,
    pub response: String,
    pub interview_over: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub generation_failed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub interview_id: Option<InterviewId>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_evaluation: Option<String>,
    pub interview_over: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub generation_failed: bool,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        let interview_over = outcome.is_over();
        match outcome {
            TurnOutcome::NextQuestion {
                question,
                generation_failed,
            } => ChatResponse {
                response: question,
                final_evaluation: None,
                interview_over,
                generation_failed,
            },
            TurnOutcome::Completed {
                closing,
                evaluation,
                generation_failed,
            } => ChatResponse {
                response: closing,
                final_evaluation: Some(evaluation),
                interview_over,
                generation_failed,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/start
pub async fn handle_start(
    State(state): State<AppState>,
    AppJson(req): AppJson<StartRequest>,
) -> Result<Json<StartResponse>, AppError> {
    let (Some(name), Some(experience)) = (req.name, req.experience) else {
        return Err(AppError::Validation(
            "Name and experience are required".to_string(),
        ));
    };

    let outcome =
        start_interview(state.store.as_ref(), state.llm.as_ref(), &name, &experience).await?;

    Ok(Json(StartResponse {
        interview_id: outcome.interview_id,
        response: outcome.question,
        interview_over: false,
        generation_failed: outcome.generation_failed,
    }))
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let interview_id = req
        .interview_id
        .ok_or_else(|| AppError::Validation("interview_id is required".to_string()))?;
    // A missing answer is recorded as an empty one; the turn still advances.
    let text = req.text.unwrap_or_default();

    let outcome =
        continue_interview(state.store.as_ref(), state.llm.as_ref(), interview_id, &text).await?;

    Ok(Json(outcome.into()))
}

/// POST /api/speak
///
/// Returns the synthesized audio as `audio/wav`.
pub async fn handle_speak(
    State(state): State<AppState>,
    AppJson(req): AppJson<SpeakRequest>,
) -> Result<Response, AppError> {
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("text is required".to_string()))?;

    let audio = state
        .speech
        .synthesize(&text)
        .await
        .map_err(|e| AppError::Speech(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], audio).into_response())
}

/// GET /api/report/:interview_id
///
/// Serves the transcript as a text attachment. Errors are plain text too.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(interview_id): Path<InterviewId>,
) -> Response {
    match export_report(state.store.as_ref(), interview_id).await {
        Ok(report) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        report_filename(interview_id)
                    ),
                ),
            ],
            report,
        )
            .into_response(),
        Err(e) => e.into_plain_text_response(),
    }
}
