//! Résumé parsing: the only stage that sends the document itself.

use tracing::info;

use crate::errors::AppError;
use crate::models::document::ResumeDocument;
use crate::models::resume::ResumeProfile;
use crate::stages::fallback::parse_or_fallback;
use crate::stages::prompts::resume_parse_prompt;
use crate::stages::{Stage, StageRunner};

/// Parses the uploaded document into a `ResumeProfile`.
///
/// Backend failure aborts the stage. An unreadable answer yields the
/// placeholder profile so the workflow can still move on.
pub async fn parse_resume(
    runner: &StageRunner,
    document: &ResumeDocument,
) -> Result<ResumeProfile, AppError> {
    let text_layer = document.pdf_text_layer().await;
    let prompt = resume_parse_prompt(document, text_layer.as_deref());

    let completion = runner
        .invoke(Stage::ResumeParsing, prompt)
        .await
        .map_err(|e| AppError::from_llm(Stage::ResumeParsing, e))?;

    let profile = parse_or_fallback(Stage::ResumeParsing, &completion, ResumeProfile::fallback);
    info!(
        "Resume parsed: {} skills, {} roles, {} education entries",
        profile.skills.len(),
        profile.experience.len(),
        profile.education.len()
    );
    Ok(profile)
}
