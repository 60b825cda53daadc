//! Persistence for interviews and their question/answer rows.
//!
//! Every write is one transaction. Model calls happen before a write begins,
//! so no transaction is held open across network I/O to the model server.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::interview::QUESTION_BUDGET;
use crate::models::interview::{InterviewId, InterviewRow, QuestionAnswerRow};

pub struct NewInterview<'a> {
    pub user_name: &'a str,
    pub programming_experience: &'a str,
}

/// The write that accompanies an answer.
#[derive(Debug, Clone, Copy)]
pub enum FollowUp<'a> {
    NextQuestion(&'a str),
    FinalEvaluation(&'a str),
}

/// An answer to the pending question plus its follow-up, committed together.
pub struct AnsweredTurn<'a> {
    pub interview_id: InterviewId,
    pub pending_qa_id: i32,
    pub answer: &'a str,
    pub follow_up: FollowUp<'a>,
}

/// Storage seam for the interview service. Carried in `AppState` as
/// `Arc<dyn InterviewStore>`.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Inserts an interview together with its first, unanswered question.
    async fn create_interview(
        &self,
        new: NewInterview<'_>,
        first_question: &str,
    ) -> Result<InterviewRow, AppError>;

    async fn find_interview(&self, id: InterviewId) -> Result<Option<InterviewRow>, AppError>;

    /// All question/answer rows of an interview, ordered by `qa_id`.
    async fn list_questions(&self, id: InterviewId) -> Result<Vec<QuestionAnswerRow>, AppError>;

    /// Attaches the answer and applies the follow-up atomically.
    ///
    /// Fails with `Conflict` and changes nothing when the interview is already
    /// evaluated, the pending question was answered in the meantime, or a new
    /// question would exceed the budget.
    async fn record_turn(&self, turn: AnsweredTurn<'_>) -> Result<(), AppError>;
}

pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn create_interview(
        &self,
        new: NewInterview<'_>,
        first_question: &str,
    ) -> Result<InterviewRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let interview: InterviewRow = sqlx::query_as(
            r#"
            INSERT INTO interviews (user_name, programming_experience)
            VALUES ($1, $2)
            RETURNING interview_id, user_name, programming_experience, interview_date, final_evaluation
            "#,
        )
        .bind(new.user_name)
        .bind(new.programming_experience)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO questions_answers (interview_id, question_text) VALUES ($1, $2)")
            .bind(interview.interview_id)
            .bind(first_question)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(interview)
    }

    async fn find_interview(&self, id: InterviewId) -> Result<Option<InterviewRow>, AppError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT interview_id, user_name, programming_experience, interview_date, final_evaluation
            FROM interviews
            WHERE interview_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_questions(&self, id: InterviewId) -> Result<Vec<QuestionAnswerRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionAnswerRow>(
            r#"
            SELECT qa_id, interview_id, question_text, answer_text
            FROM questions_answers
            WHERE interview_id = $1
            ORDER BY qa_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn record_turn(&self, turn: AnsweredTurn<'_>) -> Result<(), AppError> {
        let AnsweredTurn {
            interview_id,
            pending_qa_id,
            answer,
            follow_up,
        } = turn;

        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent turns on the same interview.
        let evaluation: Option<Option<String>> = sqlx::query_scalar(
            "SELECT final_evaluation FROM interviews WHERE interview_id = $1 FOR UPDATE",
        )
        .bind(interview_id)
        .fetch_optional(&mut *tx)
        .await?;

        match evaluation {
            None => {
                return Err(AppError::NotFound(format!(
                    "Interview {interview_id} not found"
                )))
            }
            Some(Some(_)) => {
                return Err(AppError::Conflict(format!(
                    "Interview {interview_id} is already complete"
                )))
            }
            Some(None) => {}
        }

        let attached = sqlx::query(
            r#"
            UPDATE questions_answers
            SET answer_text = $1
            WHERE qa_id = $2 AND interview_id = $3 AND answer_text IS NULL
            "#,
        )
        .bind(answer)
        .bind(pending_qa_id)
        .bind(interview_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if attached != 1 {
            return Err(AppError::Conflict(format!(
                "Question {pending_qa_id} of interview {interview_id} was already answered"
            )));
        }

        match follow_up {
            FollowUp::NextQuestion(question) => {
                let asked: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM questions_answers WHERE interview_id = $1",
                )
                .bind(interview_id)
                .fetch_one(&mut *tx)
                .await?;

                if asked >= QUESTION_BUDGET as i64 {
                    return Err(AppError::Conflict(format!(
                        "Interview {interview_id} has used its question budget"
                    )));
                }

                sqlx::query(
                    "INSERT INTO questions_answers (interview_id, question_text) VALUES ($1, $2)",
                )
                .bind(interview_id)
                .bind(question)
                .execute(&mut *tx)
                .await?;
            }
            FollowUp::FinalEvaluation(evaluation) => {
                sqlx::query("UPDATE interviews SET final_evaluation = $1 WHERE interview_id = $2")
                    .bind(evaluation)
                    .bind(interview_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        info!("Recorded answer to question {pending_qa_id} of interview {interview_id}");
        Ok(())
    }
}
