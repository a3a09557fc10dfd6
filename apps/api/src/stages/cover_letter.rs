//! Cover letter: write, then evaluate what was written.
//!
//! The evaluation prompt embeds the generated text, so the two calls are
//! strictly ordered. Only a failure of the first call fails the stage; the
//! evaluation degrades to a fixed score and never costs the letter.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::cover_letter::{CoverLetter, QualityScore};
use crate::models::resume::ResumeProfile;
use crate::stages::fallback::parse_or_fallback;
use crate::stages::prompts::{cover_letter_prompt, evaluation_prompt};
use crate::stages::{Stage, StageRunner};

pub async fn generate_cover_letter(
    runner: &StageRunner,
    profile: &ResumeProfile,
    job_description: &str,
) -> Result<CoverLetter, AppError> {
    // Used verbatim, even when empty.
    let content = runner
        .invoke(Stage::CoverLetter, cover_letter_prompt(profile, job_description))
        .await
        .map_err(|e| AppError::from_llm(Stage::CoverLetter, e))?;
    info!(
        "Cover letter generated for {}: {} words",
        profile.name,
        content.split_whitespace().count()
    );

    let quality_score = evaluate(runner, &content, job_description).await;

    Ok(CoverLetter {
        content,
        quality_score: Some(quality_score),
    })
}

async fn evaluate(runner: &StageRunner, content: &str, job_description: &str) -> QualityScore {
    match runner
        .invoke(
            Stage::CoverLetterEvaluation,
            evaluation_prompt(content, job_description),
        )
        .await
    {
        Ok(completion) => parse_or_fallback(
            Stage::CoverLetterEvaluation,
            &completion,
            QualityScore::fallback,
        ),
        Err(e) => {
            warn!("{}: backend call failed ({e}); using fallback score", Stage::CoverLetterEvaluation);
            QualityScore::fallback()
        }
    }
}
