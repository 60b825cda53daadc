use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Surrogate key of the `interviews` table.
pub type InterviewId = i32;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub interview_id: InterviewId,
    pub user_name: String,
    pub programming_experience: String,
    pub interview_date: DateTime<Utc>,
    pub final_evaluation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionAnswerRow {
    pub qa_id: i32,
    pub interview_id: InterviewId,
    pub question_text: String,
    pub answer_text: Option<String>,
}

impl QuestionAnswerRow {
    pub fn is_answered(&self) -> bool {
        self.answer_text.is_some()
    }

    /// The recorded answer, unless it is missing or blank.
    pub fn answer(&self) -> Option<&str> {
        self.answer_text
            .as_deref()
            .filter(|answer| !answer.trim().is_empty())
    }
}
