//! Plain-text interview report.

use tracing::info;

use crate::errors::AppError;
use crate::interview::prompts::NO_ANSWER_PLACEHOLDER;
use crate::interview::store::InterviewStore;
use crate::models::interview::{InterviewId, InterviewRow, QuestionAnswerRow};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";
const EVALUATION_PENDING: &str = "Evaluation pending.";

pub fn report_filename(interview_id: InterviewId) -> String {
    format!("interview_report_{interview_id}.txt")
}

/// Renders the header, one Q/A block per row in the given order, and the
/// final evaluation.
pub fn render_report(interview: &InterviewRow, transcript: &[QuestionAnswerRow]) -> String {
    let mut report = format!("Interview Report\n{}\n", "=".repeat(20));
    report.push_str(&format!("Candidate: {}\n", interview.user_name));
    report.push_str(&format!(
        "Date: {}\n",
        interview.interview_date.format(DATE_FORMAT)
    ));
    report.push_str(&format!(
        "Stated Experience: {}\n\n",
        interview.programming_experience
    ));
    report.push_str("--- Transcript ---\n\n");

    for (i, qa) in transcript.iter().enumerate() {
        let n = i + 1;
        report.push_str(&format!("Q{n}: {}\n", qa.question_text));
        report.push_str(&format!(
            "A{n}: {}\n\n",
            qa.answer().unwrap_or(NO_ANSWER_PLACEHOLDER)
        ));
    }

    report.push_str(&format!(
        "--- Final Evaluation ---\n{}\n",
        interview
            .final_evaluation
            .as_deref()
            .unwrap_or(EVALUATION_PENDING)
    ));
    report
}

/// Loads an interview and renders its report.
pub async fn export_report(
    store: &dyn InterviewStore,
    interview_id: InterviewId,
) -> Result<String, AppError> {
    let interview = store
        .find_interview(interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;
    let transcript = store.list_questions(interview_id).await?;

    let report = render_report(&interview, &transcript);
    info!("Generated report for interview {interview_id}.");
    Ok(report)
}
