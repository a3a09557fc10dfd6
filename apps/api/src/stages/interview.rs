//! Interview question generation.

use tracing::info;

use crate::errors::AppError;
use crate::models::interview::{InterviewQuestion, InterviewQuestionSet};
use crate::models::resume::ResumeProfile;
use crate::stages::fallback::parse_or_fallback;
use crate::stages::prompts::interview_prompt;
use crate::stages::{Stage, StageRunner};

/// Asks for 3 technical + 2 behavioral questions. Whatever count and mix the
/// model actually returns is accepted as long as at least one question reads.
pub async fn generate_interview_questions(
    runner: &StageRunner,
    profile: &ResumeProfile,
    job_description: &str,
) -> Result<Vec<InterviewQuestion>, AppError> {
    let completion = runner
        .invoke(
            Stage::InterviewQuestions,
            interview_prompt(profile, job_description),
        )
        .await
        .map_err(|e| AppError::from_llm(Stage::InterviewQuestions, e))?;

    let questions = parse_or_fallback(
        Stage::InterviewQuestions,
        &completion,
        InterviewQuestionSet::fallback,
    )
    .into_questions();

    info!("Prepared {} interview questions", questions.len());
    Ok(questions)
}
