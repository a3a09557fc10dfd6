//! Skill-gap analysis of a parsed résumé against a job description.

use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeProfile;
use crate::models::skill_gap::SkillGapAssessment;
use crate::stages::fallback::parse_or_fallback;
use crate::stages::prompts::skill_gap_prompt;
use crate::stages::{Stage, StageRunner};

pub async fn analyze_skill_gap(
    runner: &StageRunner,
    profile: &ResumeProfile,
    job_description: &str,
) -> Result<SkillGapAssessment, AppError> {
    let completion = runner
        .invoke(Stage::SkillGap, skill_gap_prompt(profile, job_description))
        .await
        .map_err(|e| AppError::from_llm(Stage::SkillGap, e))?;

    let assessment = parse_or_fallback(Stage::SkillGap, &completion, || {
        SkillGapAssessment::fallback(&profile.skills)
    });
    info!(
        "Skill gap: {}% match, {} matched, {} missing",
        assessment.match_percentage,
        assessment.matched_skills.len(),
        assessment.missing_skills.len()
    );
    Ok(assessment)
}
