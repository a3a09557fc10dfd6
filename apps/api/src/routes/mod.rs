pub mod auth;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::stages::handlers;
use crate::state::AppState;
use crate::workflow::handlers as sessions;

/// Upload ceiling for résumé files and base64 bodies.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Stateless pipelines
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/generate", post(handlers::handle_generate))
        // Workflow sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/document",
            put(sessions::handle_upload_document),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            put(sessions::handle_set_job_description),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(sessions::handle_session_analyze),
        )
        .route(
            "/api/v1/sessions/:id/cover-letter",
            post(sessions::handle_session_cover_letter),
        )
        .route(
            "/api/v1/sessions/:id/interview-questions",
            post(sessions::handle_session_interview_questions),
        )
        .route(
            "/api/v1/sessions/:id/navigate",
            post(sessions::handle_navigate),
        )
        .route("/api/v1/sessions/:id/reset", post(sessions::handle_reset))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_service_key,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
