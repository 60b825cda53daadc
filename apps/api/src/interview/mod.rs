// Interview orchestration: progress tracking, prompts, persistence, report export.
// All model calls go through llm_client; all SQL lives in store.rs.

pub mod handlers;
pub mod progress;
pub mod prompts;
pub mod report;
pub mod session;
pub mod store;

/// Maximum number of questions asked before the interview is evaluated.
pub const QUESTION_BUDGET: usize = 10;

/// Nominal interview length advertised to clients. Not enforced.
pub const INTERVIEW_DURATION_MINUTES: u32 = 20;
