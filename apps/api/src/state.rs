use std::sync::Arc;

use crate::interview::store::InterviewStore;
use crate::llm_client::ChatCompleter;
use crate::speech_client::SpeechSynthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Interview persistence. Default: `PgInterviewStore`.
    pub store: Arc<dyn InterviewStore>,
    /// Chat-completion backend. Default: `LlmClient`.
    pub llm: Arc<dyn ChatCompleter>,
    /// Text-to-speech backend. Default: `SpeechClient`.
    pub speech: Arc<dyn SpeechSynthesizer>,
}
