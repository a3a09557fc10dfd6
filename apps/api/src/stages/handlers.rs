//! Axum route handlers for the stateless Analyze and Generate operations.

use std::str::FromStr;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::cover_letter::CoverLetter;
use crate::models::document::ResumeDocument;
use crate::models::interview::InterviewQuestion;
use crate::models::resume::ResumeProfile;
use crate::stages::analysis::{analyze, validate_job_description, Analysis};
use crate::stages::cover_letter::generate_cover_letter;
use crate::stages::interview::generate_interview_questions;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Raw base64 or a `data:` URL.
    pub resume_base64: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// `cover-letter` or `interview-questions`. Kept as text so an unknown
    /// value gets a clear error instead of a generic body rejection.
    #[serde(rename = "type")]
    pub kind: String,
    pub resume_data: ResumeProfile,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    CoverLetter,
    InterviewQuestions,
}

impl FromStr for GenerationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cover-letter" => Ok(GenerationKind::CoverLetter),
            "interview-questions" => Ok(GenerationKind::InterviewQuestions),
            other => Err(AppError::Validation(format!(
                "Invalid generation type: '{other}'. Expected 'cover-letter' or 'interview-questions'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    #[serde(rename_all = "camelCase")]
    CoverLetter { cover_letter: CoverLetter },
    #[serde(rename_all = "camelCase")]
    InterviewQuestions {
        interview_questions: Vec<InterviewQuestion>,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Résumé parsing then skill-gap analysis. Input is validated before any
/// backend call is made.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Analysis>, AppError> {
    let document = ResumeDocument::from_base64(
        &request.resume_base64,
        request.mime_type.as_deref(),
        request.file_name.as_deref(),
    )?;
    validate_job_description(
        &request.job_description,
        state.config.min_job_description_chars,
    )?;

    let analysis = analyze(&state.runner, &document, &request.job_description).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/generate
///
/// Dispatches to the cover-letter or interview-question pipeline.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let kind: GenerationKind = request.kind.parse()?;
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let response = match kind {
        GenerationKind::CoverLetter => GenerateResponse::CoverLetter {
            cover_letter: generate_cover_letter(
                &state.runner,
                &request.resume_data,
                &request.job_description,
            )
            .await?,
        },
        GenerationKind::InterviewQuestions => GenerateResponse::InterviewQuestions {
            interview_questions: generate_interview_questions(
                &state.runner,
                &request.resume_data,
                &request.job_description,
            )
            .await?,
        },
    };

    Ok(Json(response))
}
