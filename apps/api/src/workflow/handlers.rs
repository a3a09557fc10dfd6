//! Axum route handlers for workflow sessions.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::ResumeDocument;
use crate::state::AppState;
use crate::workflow::{SessionSnapshot, WorkflowPhase};

/// Multipart field carrying the résumé file.
const DOCUMENT_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub phase: WorkflowPhase,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    (StatusCode::CREATED, Json(state.workflow.create().await))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.workflow.snapshot(id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.workflow.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/document
///
/// Multipart upload; the résumé is read from the `file` field.
pub async fn handle_upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart data: {e}")))?
    {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let media_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        let document =
            ResumeDocument::new(bytes, media_type.as_deref(), file_name.as_deref())?;
        return Ok(Json(state.workflow.set_document(id, document).await?));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{DOCUMENT_FIELD}' is required"
    )))
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state
            .workflow
            .set_job_description(id, request.job_description)
            .await?,
    ))
}

/// POST /api/v1/sessions/:id/analyze
pub async fn handle_session_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.workflow.analyze(id).await?))
}

/// POST /api/v1/sessions/:id/cover-letter
pub async fn handle_session_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.workflow.cover_letter(id).await?))
}

/// POST /api/v1/sessions/:id/interview-questions
pub async fn handle_session_interview_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.workflow.interview_questions(id).await?))
}

/// POST /api/v1/sessions/:id/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.workflow.navigate(id, request.phase).await?))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.workflow.reset(id).await?))
}

#[cfg(test)]
mod tests {
    use crate::llm_client::testing::ScriptedBackend;
    use crate::routes::build_router;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "hire-api-test-boundary";
    const JD: &str = "Platform engineer: Rust, Tokio, PostgreSQL and Kubernetes in production.";

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"cv.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = send(app, empty_request("POST", "/api/v1/sessions")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phase"], "upload");
        assert_eq!(body["isProcessing"], false);
        body["sessionId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_session_walkthrough() {
        let backend = Arc::new(ScriptedBackend::replying(&[
            r#"{"name": "Grace Hopper", "skills": ["COBOL", "Rust"]}"#,
            r#"{"matchedSkills": ["Rust"], "missingSkills": ["Kubernetes"], "matchPercentage": "65%"}"#,
            "Dear Hiring Manager, ...",
            "not json",
        ]));
        let app = build_router(AppState::for_tests(backend.clone()));
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        let (status, body) = send(
            &app,
            upload_request(&format!("{base}/document"), "file", b"\x89PNG"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["fileName"], "cv.png");
        assert_eq!(body["document"]["mediaType"], "image/png");

        let (status, _) = send(
            &app,
            json_request("PUT", &format!("{base}/job-description"), json!({"jobDescription": JD})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, empty_request("POST", &format!("{base}/analyze"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "analyze");
        assert_eq!(body["resumeData"]["name"], "Grace Hopper");
        assert_eq!(body["skillGap"]["matchPercentage"], 65);

        let (status, body) =
            send(&app, empty_request("POST", &format!("{base}/cover-letter"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "generate");
        assert_eq!(body["coverLetter"]["qualityScore"]["overall"], 8.0);

        let (status, body) = send(
            &app,
            json_request("POST", &format!("{base}/navigate"), json!({"phase": "upload"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "upload");
        assert_eq!(body["coverLetter"]["content"], "Dear Hiring Manager, ...");
        assert_eq!(backend.call_count(), 4);
    }

    #[tokio::test]
    async fn test_navigation_refused_without_profile() {
        let app = build_router(AppState::for_tests(Arc::new(ScriptedBackend::default())));
        let id = new_session(&app).await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/navigate"),
                json!({"phase": "refine"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "NAVIGATION_REFUSED");
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let app = build_router(AppState::for_tests(Arc::new(ScriptedBackend::default())));
        let id = new_session(&app).await;

        let (status, body) = send(
            &app,
            upload_request(&format!("/api/v1/sessions/{id}/document"), "resume", b"data"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("'file'"));
    }

    #[tokio::test]
    async fn test_analyze_without_document_is_validation_error() {
        let backend = Arc::new(ScriptedBackend::default());
        let app = build_router(AppState::for_tests(backend.clone()));
        let id = new_session(&app).await;

        let (status, body) = send(
            &app,
            empty_request("POST", &format!("/api/v1/sessions/{id}/analyze")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_sessions() {
        let app = build_router(AppState::for_tests(Arc::new(ScriptedBackend::default())));
        let (status, _) = send(
            &app,
            empty_request("GET", "/api/v1/sessions/00000000-0000-0000-0000-000000000000"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");
        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
