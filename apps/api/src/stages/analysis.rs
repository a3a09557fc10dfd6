//! The analyze operation: résumé parsing followed by skill-gap analysis.
//!
//! Both calls run as one logical stage. The second embeds the first's skills,
//! so they are strictly sequential.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::document::ResumeDocument;
use crate::models::resume::ResumeProfile;
use crate::models::skill_gap::SkillGapAssessment;
use crate::stages::resume::parse_resume;
use crate::stages::skill_gap::analyze_skill_gap;
use crate::stages::StageRunner;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub resume_data: ResumeProfile,
    pub skill_gap: SkillGapAssessment,
}

/// The trimmed job description must be strictly longer than `min_chars`.
pub fn validate_job_description(job_description: &str, min_chars: usize) -> Result<(), AppError> {
    let length = job_description.trim().chars().count();
    if length <= min_chars {
        return Err(AppError::Validation(format!(
            "Job description is too short ({length} characters, needs more than {min_chars})"
        )));
    }
    Ok(())
}

pub async fn analyze(
    runner: &StageRunner,
    document: &ResumeDocument,
    job_description: &str,
) -> Result<Analysis, AppError> {
    info!(
        "Analyzing {} ({}, {} bytes)",
        document.file_name,
        document.media_type,
        document.bytes.len()
    );
    let resume_data = parse_resume(runner, document).await?;
    let skill_gap = analyze_skill_gap(runner, &resume_data, job_description).await?;

    Ok(Analysis {
        resume_data,
        skill_gap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::llm_client::MessageContent;
    use bytes::Bytes;
    use std::sync::Arc;

    const RESUME_JSON: &str = r#"{"name": "Ada Lovelace", "email": "ada@example.com", "skills": ["Rust", "Tokio", "PostgreSQL"], "experience": [{"title": "Engineer", "company": "Engines Ltd", "duration": "5 years", "description": "Async services"}], "education": [], "summary": "Systems engineer."}"#;
    const GAP_JSON: &str = r#"{"matchedSkills": ["Rust", "Tokio"], "missingSkills": ["Kubernetes"], "matchPercentage": 80, "learningPaths": [{"skill": "Kubernetes", "resources": ["Kubernetes Up & Running"], "estimatedTime": "4 weeks"}]}"#;
    const JD: &str = "We are hiring a backend engineer with Rust, Tokio and Kubernetes experience.";

    fn document() -> ResumeDocument {
        ResumeDocument::new(Bytes::from_static(b"png"), Some("image/png"), None).unwrap()
    }

    #[test]
    fn test_job_description_length_is_checked_after_trim() {
        assert!(validate_job_description(&"x".repeat(51), 50).is_ok());
        assert!(matches!(
            validate_job_description(&"x".repeat(50), 50),
            Err(AppError::Validation(_))
        ));
        let padded = format!("   {}   ", "x".repeat(50));
        assert!(matches!(
            validate_job_description(&padded, 50),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_skill_gap_prompt_uses_parsed_skills() {
        let backend = Arc::new(ScriptedBackend::replying(&[RESUME_JSON, GAP_JSON]));
        let runner = StageRunner::new(backend.clone(), "test-model");

        let analysis = analyze(&runner, &document(), JD).await.unwrap();
        assert_eq!(analysis.resume_data.name, "Ada Lovelace");
        assert_eq!(analysis.skill_gap.match_percentage, 80);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        match &requests[1].user {
            MessageContent::Text(text) => {
                assert!(text.contains(r#"["Rust","Tokio","PostgreSQL"]"#));
                assert!(text.contains(JD));
            }
            MessageContent::Parts(_) => panic!("skill gap prompt is text-only"),
        }
    }

    #[tokio::test]
    async fn test_same_inputs_same_outputs() {
        let first = Arc::new(ScriptedBackend::replying(&[RESUME_JSON, GAP_JSON]));
        let second = Arc::new(ScriptedBackend::replying(&[RESUME_JSON, GAP_JSON]));

        let a = analyze(&StageRunner::new(first, "m"), &document(), JD).await.unwrap();
        let b = analyze(&StageRunner::new(second, "m"), &document(), JD).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_fallbacks_chain_through_both_calls() {
        let backend = Arc::new(ScriptedBackend::replying(&["not json", "still not json"]));
        let runner = StageRunner::new(backend, "test-model");

        let analysis = analyze(&runner, &document(), JD).await.unwrap();
        assert_eq!(analysis.resume_data.name, "Unknown Candidate");
        assert_eq!(
            analysis.skill_gap.matched_skills,
            vec!["Unable to parse skills"]
        );
        assert_eq!(analysis.skill_gap.match_percentage, 70);
    }

    #[tokio::test]
    async fn test_parsing_failure_skips_gap_call() {
        let backend = Arc::new(ScriptedBackend::new(vec![ScriptedBackend::failure(
            401, "bad key",
        )]));
        let runner = StageRunner::new(backend.clone(), "test-model");

        assert!(analyze(&runner, &document(), JD).await.is_err());
        assert_eq!(backend.call_count(), 1);
    }
}
