//! Interview orchestration: start an interview and advance it one answer at a time.

use anyhow::anyhow;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::progress::{next_step, InterviewProgress, NextStep};
use crate::interview::prompts::{
    evaluation_messages, next_question_messages, opening_messages, CLOSING_MESSAGE,
};
use crate::interview::store::{AnsweredTurn, FollowUp, InterviewStore, NewInterview};
use crate::llm_client::{ChatCompleter, Completion, DEFAULT_TEMPERATURE, FALLBACK_REPLY};
use crate::models::interview::InterviewId;

#[derive(Debug, Clone, PartialEq)]
pub struct StartOutcome {
    pub interview_id: InterviewId,
    pub question: String,
    /// The model call failed and the fallback reply was used.
    pub generation_failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    NextQuestion {
        question: String,
        generation_failed: bool,
    },
    Completed {
        closing: String,
        evaluation: String,
        generation_failed: bool,
    },
}

impl TurnOutcome {
    pub fn is_over(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }
}

/// Model text plus whether it is the fallback.
struct Reply {
    text: String,
    degraded: bool,
}

/// Degrades a failed completion to the fixed apology so the interview can
/// still move forward.
fn reply_or_fallback(completion: Completion, purpose: &str) -> Reply {
    match completion {
        Completion::Generated(text) => Reply {
            text,
            degraded: false,
        },
        Completion::Failed(e) => {
            warn!("Using fallback reply for {purpose}: {e}");
            Reply {
                text: FALLBACK_REPLY.to_string(),
                degraded: true,
            }
        }
    }
}

/// Creates an interview and asks the opening question.
pub async fn start_interview(
    store: &dyn InterviewStore,
    llm: &dyn ChatCompleter,
    name: &str,
    experience: &str,
) -> Result<StartOutcome, AppError> {
    let name = name.trim();
    let experience = experience.trim();
    if name.is_empty() || experience.is_empty() {
        return Err(AppError::Validation(
            "Name and experience are required".to_string(),
        ));
    }

    let completion = llm
        .complete(&opening_messages(name, experience), DEFAULT_TEMPERATURE)
        .await;
    let reply = reply_or_fallback(completion, "opening question");

    let interview = store
        .create_interview(
            NewInterview {
                user_name: name,
                programming_experience: experience,
            },
            &reply.text,
        )
        .await?;

    info!(
        "Started interview {} for {}.",
        interview.interview_id, interview.user_name
    );

    Ok(StartOutcome {
        interview_id: interview.interview_id,
        question: reply.text,
        generation_failed: reply.degraded,
    })
}

/// Records the answer to the pending question, then asks the next question
/// or, once the budget is used, writes the final evaluation. A blank answer
/// is recorded as given and still advances the interview.
pub async fn continue_interview(
    store: &dyn InterviewStore,
    llm: &dyn ChatCompleter,
    interview_id: InterviewId,
    answer: &str,
) -> Result<TurnOutcome, AppError> {
    let interview = store
        .find_interview(interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;
    let mut transcript = store.list_questions(interview_id).await?;

    let progress = InterviewProgress::derive(&interview, &transcript)
        .map_err(|e| AppError::Internal(anyhow!("Interview {interview_id} is inconsistent: {e}")))?;

    let (question_number, pending_qa_id) = match progress {
        InterviewProgress::Completed => {
            return Err(AppError::Conflict(format!(
                "Interview {interview_id} is already complete"
            )))
        }
        InterviewProgress::AwaitingAnswer {
            question_number,
            pending_qa_id,
        } => (question_number, pending_qa_id),
    };

    // The pending question is the last row; replay it with its new answer.
    if let Some(pending) = transcript.last_mut() {
        pending.answer_text = Some(answer.to_string());
    }

    match next_step(question_number) {
        NextStep::Evaluate => {
            let completion = llm
                .complete(&evaluation_messages(&transcript), DEFAULT_TEMPERATURE)
                .await;
            let reply = reply_or_fallback(completion, "final evaluation");

            store
                .record_turn(AnsweredTurn {
                    interview_id,
                    pending_qa_id,
                    answer,
                    follow_up: FollowUp::FinalEvaluation(&reply.text),
                })
                .await?;

            info!("Interview {interview_id} finished. Final evaluation generated.");
            Ok(TurnOutcome::Completed {
                closing: CLOSING_MESSAGE.to_string(),
                evaluation: reply.text,
                generation_failed: reply.degraded,
            })
        }
        NextStep::AskQuestion(number) => {
            let completion = llm
                .complete(&next_question_messages(&transcript), DEFAULT_TEMPERATURE)
                .await;
            let reply = reply_or_fallback(completion, "next question");

            store
                .record_turn(AnsweredTurn {
                    interview_id,
                    pending_qa_id,
                    answer,
                    follow_up: FollowUp::NextQuestion(&reply.text),
                })
                .await?;

            info!("Asking question {number} for interview {interview_id}.");
            Ok(TurnOutcome::NextQuestion {
                question: reply.text,
                generation_failed: reply.degraded,
            })
        }
    }
}
