// Prompts and message builders for the interviewer.
// Questions replay as `assistant` turns, candidate answers as `user` turns.

use crate::llm_client::ChatMessage;
use crate::models::interview::QuestionAnswerRow;

pub const OPENING_PROMPT_TEMPLATE: &str = "You are an AI interviewer. \
    The candidate's name is {name} and their experience is: '{experience}'. \
    Start the interview by greeting them and asking your first technical question \
    based on their stated experience. Keep the question moderately difficult.";

pub const NEXT_QUESTION_SYSTEM: &str = "You are an AI interviewer. \
    Continue the interview based on the history. Ask the next logical question. \
    Vary the difficulty. Do not repeat questions.";

pub const EVALUATION_SYSTEM: &str = "You are an expert technical interviewer. \
    Based on the following Q&A history, provide a concise final evaluation of the \
    candidate's performance. Mention strengths and weaknesses.";

/// Stands in for a missing or blank answer in evaluation prompts and reports.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer provided.";

pub const CLOSING_MESSAGE: &str = "Thank you for your time. The interview is now complete.";

pub fn opening_messages(name: &str, experience: &str) -> Vec<ChatMessage> {
    let prompt = OPENING_PROMPT_TEMPLATE
        .replace("{name}", name)
        .replace("{experience}", experience);
    vec![ChatMessage::system(prompt)]
}

/// History replay for the next question. Unanswered and blank turns are skipped.
pub fn next_question_messages(transcript: &[QuestionAnswerRow]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(NEXT_QUESTION_SYSTEM)];
    for qa in transcript {
        messages.push(ChatMessage::assistant(qa.question_text.as_str()));
        if let Some(answer) = qa.answer() {
            messages.push(ChatMessage::user(answer));
        }
    }
    messages
}

/// History replay for the final evaluation. Every question gets a candidate
/// turn, with the placeholder where the answer is missing or blank.
pub fn evaluation_messages(transcript: &[QuestionAnswerRow]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(EVALUATION_SYSTEM)];
    for qa in transcript {
        messages.push(ChatMessage::assistant(qa.question_text.as_str()));
        messages.push(ChatMessage::user(
            qa.answer().unwrap_or(NO_ANSWER_PLACEHOLDER),
        ));
    }
    messages
}
