//! In-memory test doubles for the store, completer and synthesizer seams.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use chrono::Utc;

use crate::errors::AppError;
use crate::interview::store::{AnsweredTurn, FollowUp, InterviewStore, NewInterview};
use crate::interview::QUESTION_BUDGET;
use crate::llm_client::{ChatCompleter, ChatMessage, Completion, LlmError};
use crate::models::interview::{InterviewId, InterviewRow, QuestionAnswerRow};
use crate::speech_client::{SpeechError, SpeechSynthesizer};
use crate::state::AppState;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Default)]
struct Tables {
    interviews: Vec<InterviewRow>,
    questions: Vec<QuestionAnswerRow>,
}

/// Mirrors the transactional behaviour of `PgInterviewStore`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn interview_count(&self) -> usize {
        self.tables.lock().unwrap().interviews.len()
    }

    pub fn questions(&self, id: InterviewId) -> Vec<QuestionAnswerRow> {
        self.tables
            .lock()
            .unwrap()
            .questions
            .iter()
            .filter(|qa| qa.interview_id == id)
            .cloned()
            .collect()
    }

    pub fn interview(&self, id: InterviewId) -> Option<InterviewRow> {
        self.tables
            .lock()
            .unwrap()
            .interviews
            .iter()
            .find(|i| i.interview_id == id)
            .cloned()
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn create_interview(
        &self,
        new: NewInterview<'_>,
        first_question: &str,
    ) -> Result<InterviewRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let interview = InterviewRow {
            interview_id: tables.interviews.len() as InterviewId + 1,
            user_name: new.user_name.to_string(),
            programming_experience: new.programming_experience.to_string(),
            interview_date: Utc::now(),
            final_evaluation: None,
        };
        let qa_id = tables.questions.len() as i32 + 1;
        tables.questions.push(QuestionAnswerRow {
            qa_id,
            interview_id: interview.interview_id,
            question_text: first_question.to_string(),
            answer_text: None,
        });
        tables.interviews.push(interview.clone());
        Ok(interview)
    }

    async fn find_interview(&self, id: InterviewId) -> Result<Option<InterviewRow>, AppError> {
        Ok(self.interview(id))
    }

    async fn list_questions(&self, id: InterviewId) -> Result<Vec<QuestionAnswerRow>, AppError> {
        Ok(self.questions(id))
    }

    async fn record_turn(&self, turn: AnsweredTurn<'_>) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Tables {
            interviews,
            questions,
        } = &mut *tables;

        let interview = interviews
            .iter_mut()
            .find(|i| i.interview_id == turn.interview_id)
            .ok_or_else(|| AppError::NotFound(format!("Interview {} not found", turn.interview_id)))?;
        if interview.final_evaluation.is_some() {
            return Err(AppError::Conflict("already complete".to_string()));
        }

        let asked = questions
            .iter()
            .filter(|qa| qa.interview_id == turn.interview_id)
            .count();
        let pending = questions
            .iter_mut()
            .find(|qa| {
                qa.qa_id == turn.pending_qa_id
                    && qa.interview_id == turn.interview_id
                    && qa.answer_text.is_none()
            })
            .ok_or_else(|| AppError::Conflict("already answered".to_string()))?;

        match turn.follow_up {
            FollowUp::NextQuestion(question) => {
                if asked >= QUESTION_BUDGET {
                    return Err(AppError::Conflict("budget used".to_string()));
                }
                pending.answer_text = Some(turn.answer.to_string());
                let qa_id = questions.len() as i32 + 1;
                questions.push(QuestionAnswerRow {
                    qa_id,
                    interview_id: turn.interview_id,
                    question_text: question.to_string(),
                    answer_text: None,
                });
            }
            FollowUp::FinalEvaluation(evaluation) => {
                pending.answer_text = Some(turn.answer.to_string());
                interview.final_evaluation = Some(evaluation.to_string());
            }
        }
        Ok(())
    }
}

/// Replies with queued texts, then with numbered questions. Records every
/// message sequence it receives.
#[derive(Default)]
pub struct ScriptedCompleter {
    replies: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompleter {
    /// Queues one reply; `None` produces a failed completion.
    pub fn push(&self, reply: Option<&str>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(reply.map(str::to_string));
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompleter for ScriptedCompleter {
    async fn complete(&self, messages: &[ChatMessage], _temperature: f32) -> Completion {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages.to_vec());
            calls.len()
        };
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(text)) => Completion::Generated(text),
            Some(None) => Completion::Failed(LlmError::EmptyContent),
            None => Completion::Generated(format!("Generated reply {call_number}")),
        }
    }
}

/// Returns fixed audio, or fails when constructed with `failing`.
pub struct FakeSpeech {
    fail: bool,
}

impl FakeSpeech {
    pub fn working() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        if self.fail {
            return Err(SpeechError::Api {
                status: 503,
                message: "tts offline".to_string(),
            });
        }
        Ok(Bytes::from(format!("RIFF{text}")))
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub llm: Arc<ScriptedCompleter>,
    pub state: AppState,
}

pub fn test_app(speech: FakeSpeech) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let llm = Arc::new(ScriptedCompleter::default());
    let state = AppState {
        store: store.clone(),
        llm: llm.clone(),
        speech: Arc::new(speech),
    };
    TestApp { store, llm, state }
}
