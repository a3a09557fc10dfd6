// Stage pipelines: build prompt → invoke → extract → fall back.
// All backend calls go through `StageRunner`, which wraps `dyn LlmBackend`.

pub mod analysis;
pub mod cover_letter;
pub mod fallback;
pub mod handlers;
pub mod interview;
pub mod prompts;
pub mod resume;
pub mod skill_gap;

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::llm_client::{CompletionRequest, LlmBackend, LlmError, MessageContent};

/// One backend round-trip within a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResumeParsing,
    SkillGap,
    CoverLetter,
    CoverLetterEvaluation,
    InterviewQuestions,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::ResumeParsing => "Resume parsing",
            Stage::SkillGap => "Skill gap analysis",
            Stage::CoverLetter => "Cover letter generation",
            Stage::CoverLetterEvaluation => "Cover letter evaluation",
            Stage::InterviewQuestions => "Interview question generation",
        };
        f.write_str(label)
    }
}

/// System instruction plus user content for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePrompt {
    pub system: String,
    pub user: MessageContent,
}

/// Issues stage calls against one backend and model.
#[derive(Clone)]
pub struct StageRunner {
    backend: Arc<dyn LlmBackend>,
    model: String,
}

impl StageRunner {
    pub fn new(backend: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Exactly one backend request; the raw completion text comes back.
    pub async fn invoke(&self, stage: Stage, prompt: StagePrompt) -> Result<String, LlmError> {
        info!("{stage}: invoking model {}", self.model);
        let request = CompletionRequest {
            model: self.model.clone(),
            system: prompt.system,
            user: prompt.user,
        };
        self.backend.complete(&request).await
    }
}
