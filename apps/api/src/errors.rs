use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::stages::Stage;
use crate::workflow::WorkflowPhase;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Extraction problems never show up here: stages absorb them with fallbacks.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{stage} failed: {reason}")]
    Invocation { stage: Stage, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("The {0} step is already in progress for this session")]
    Busy(WorkflowPhase),

    #[error("Cannot move to {0}: analyze a resume first")]
    Navigation(WorkflowPhase),

    #[error("The session moved on before the {0} result arrived; the result was discarded")]
    Superseded(WorkflowPhase),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps an invoker failure onto the stage that issued the call.
    pub fn from_llm(stage: Stage, err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => AppError::Configuration(err.to_string()),
            LlmError::Api { status, message } if message.is_empty() => AppError::Invocation {
                stage,
                reason: format!("backend returned status {status}"),
            },
            LlmError::Api { status, message } => AppError::Invocation {
                stage,
                reason: format!("backend returned status {status}: {message}"),
            },
            other => AppError::Invocation {
                stage,
                reason: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Invocation { .. } => {
                tracing::error!("LLM error: {self}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!("{self}. Please try again."),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Busy(_) => (StatusCode::CONFLICT, "BUSY", self.to_string()),
            AppError::Navigation(_) => (StatusCode::CONFLICT, "NAVIGATION_REFUSED", self.to_string()),
            AppError::Superseded(_) => (StatusCode::CONFLICT, "SUPERSEDED", self.to_string()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
