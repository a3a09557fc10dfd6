//! The four-phase application workflow.
//!
//! `WorkflowContext` is an immutable snapshot: every transition builds a new
//! one from the old, and the session swaps it in whole. Nothing here performs
//! I/O; the async drivers live in `session.rs`.

pub mod handlers;
pub mod session;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::cover_letter::CoverLetter;
use crate::models::document::ResumeDocument;
use crate::models::interview::InterviewQuestion;
use crate::models::resume::ResumeProfile;
use crate::models::skill_gap::SkillGapAssessment;
use crate::stages::analysis::validate_job_description;

pub use session::{SessionSnapshot, Workflow};

/// Linear phase order: upload < analyze < generate < refine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowPhase {
    #[default]
    Upload,
    Analyze,
    Generate,
    Refine,
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkflowPhase::Upload => "upload",
            WorkflowPhase::Analyze => "analyze",
            WorkflowPhase::Generate => "generate",
            WorkflowPhase::Refine => "refine",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowContext {
    pub phase: WorkflowPhase,
    pub document: Option<ResumeDocument>,
    pub job_description: String,
    pub resume_data: Option<ResumeProfile>,
    pub skill_gap: Option<SkillGapAssessment>,
    pub cover_letter: Option<CoverLetter>,
    pub interview_questions: Vec<InterviewQuestion>,
    /// Message from the last failed transition, cleared by the next attempt.
    pub error: Option<String>,
}

/// Inputs captured for the analyze pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzeInputs {
    pub document: ResumeDocument,
    pub job_description: String,
}

/// Inputs captured for the generate and refine pipelines.
#[derive(Debug, Clone)]
pub struct ProfileInputs {
    pub profile: ResumeProfile,
    pub job_description: String,
}

impl WorkflowContext {
    pub fn with_document(&self, document: ResumeDocument) -> Self {
        Self {
            document: Some(document),
            ..self.clone()
        }
    }

    pub fn with_job_description(&self, job_description: String) -> Self {
        Self {
            job_description,
            ..self.clone()
        }
    }

    /// Checks upload → analyze prerequisites. Nothing is sent on failure.
    pub fn analyze_inputs(&self, min_job_description_chars: usize) -> Result<AnalyzeInputs, AppError> {
        let document = self
            .document
            .clone()
            .ok_or_else(|| AppError::Validation("Upload a resume first".to_string()))?;
        validate_job_description(&self.job_description, min_job_description_chars)?;
        Ok(AnalyzeInputs {
            document,
            job_description: self.job_description.clone(),
        })
    }

    /// Generate and refine both need a parsed résumé.
    pub fn profile_inputs(&self, target: WorkflowPhase) -> Result<ProfileInputs, AppError> {
        let profile = self
            .resume_data
            .clone()
            .ok_or(AppError::Navigation(target))?;
        Ok(ProfileInputs {
            profile,
            job_description: self.job_description.clone(),
        })
    }

    /// Marks a pipeline for `phase` as started.
    pub fn entering(&self, phase: WorkflowPhase) -> Self {
        Self {
            phase,
            error: None,
            ..self.clone()
        }
    }

    /// A new profile invalidates letters and questions written for the old one.
    pub fn with_analysis(&self, resume_data: ResumeProfile, skill_gap: SkillGapAssessment) -> Self {
        Self {
            phase: WorkflowPhase::Analyze,
            resume_data: Some(resume_data),
            skill_gap: Some(skill_gap),
            cover_letter: None,
            interview_questions: Vec::new(),
            error: None,
            ..self.clone()
        }
    }

    pub fn with_cover_letter(&self, cover_letter: CoverLetter) -> Self {
        Self {
            phase: WorkflowPhase::Generate,
            cover_letter: Some(cover_letter),
            error: None,
            ..self.clone()
        }
    }

    pub fn with_interview_questions(&self, questions: Vec<InterviewQuestion>) -> Self {
        Self {
            phase: WorkflowPhase::Refine,
            interview_questions: questions,
            error: None,
            ..self.clone()
        }
    }

    /// Failed transition: back to `phase`, artifacts untouched.
    pub fn with_failure(&self, phase: WorkflowPhase, message: String) -> Self {
        Self {
            phase,
            error: Some(message),
            ..self.clone()
        }
    }

    /// Upload is always reachable; every later phase needs a parsed résumé.
    pub fn can_navigate(&self, target: WorkflowPhase) -> bool {
        target == WorkflowPhase::Upload || self.resume_data.is_some()
    }

    pub fn navigate(&self, target: WorkflowPhase) -> Result<Self, AppError> {
        if !self.can_navigate(target) {
            return Err(AppError::Navigation(target));
        }
        Ok(Self {
            phase: target,
            ..self.clone()
        })
    }
}
