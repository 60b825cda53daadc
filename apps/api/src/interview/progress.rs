//! Interview progress — an explicit state value derived from persisted rows.
//!
//! The pending question is never looked up as "latest row with a null answer";
//! it is derived once from the full ordered history, which is also checked
//! against the row invariants.

use thiserror::Error;

use crate::interview::QUESTION_BUDGET;
use crate::models::interview::{InterviewRow, QuestionAnswerRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewProgress {
    /// Question `question_number` (1-based) has been asked and awaits an answer.
    AwaitingAnswer {
        question_number: usize,
        pending_qa_id: i32,
    },
    /// The final evaluation has been written.
    Completed,
}

/// What follows once the pending question has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    AskQuestion(usize),
    Evaluate,
}

/// Persisted rows that break the one-pending-question invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("interview has no questions")]
    NoQuestions,

    #[error("interview has no pending question")]
    NoPendingQuestion,

    #[error("question {qa_id} is unanswered but is not the latest question")]
    StrayPending { qa_id: i32 },

    #[error("interview has {count} questions, over the budget of {}", QUESTION_BUDGET)]
    OverBudget { count: usize },
}

impl InterviewProgress {
    /// Derives progress from the interview row and its history ordered by `qa_id`.
    pub fn derive(
        interview: &InterviewRow,
        history: &[QuestionAnswerRow],
    ) -> Result<Self, ProgressError> {
        if interview.final_evaluation.is_some() {
            return Ok(InterviewProgress::Completed);
        }

        let (last, earlier) = history.split_last().ok_or(ProgressError::NoQuestions)?;

        if history.len() > QUESTION_BUDGET {
            return Err(ProgressError::OverBudget {
                count: history.len(),
            });
        }
        if let Some(stray) = earlier.iter().find(|qa| !qa.is_answered()) {
            return Err(ProgressError::StrayPending { qa_id: stray.qa_id });
        }
        if last.is_answered() {
            return Err(ProgressError::NoPendingQuestion);
        }

        Ok(InterviewProgress::AwaitingAnswer {
            question_number: history.len(),
            pending_qa_id: last.qa_id,
        })
    }
}

/// The step after question `question_number` is answered. Reaching the budget
/// is the only way an interview ends.
pub fn next_step(question_number: usize) -> NextStep {
    if question_number >= QUESTION_BUDGET {
        NextStep::Evaluate
    } else {
        NextStep::AskQuestion(question_number + 1)
    }
}
