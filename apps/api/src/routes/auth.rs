//! Service-key check for the `/api/v1` routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying the key when no bearer token is sent.
const API_KEY_HEADER: &str = "apikey";

/// Rejects requests that do not present `SERVICE_API_KEY`, either as
/// `Authorization: Bearer <key>` or in the `apikey` header.
/// A no-op when no key is configured.
pub async fn require_service_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.service_api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let matches = presented_key(req.headers()).map(|key| key == expected);
    match matches {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            warn!("Rejected request to {}: wrong service key", req.uri().path());
            Err(AppError::Unauthorized)
        }
        None => Err(AppError::Unauthorized),
    }
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    bearer.or_else(|| {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::routes::build_router;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn guarded_app() -> Router {
        let config = Config {
            service_api_key: Some("s3cret".to_string()),
            ..Config::for_tests()
        };
        build_router(AppState::new(config, Arc::new(ScriptedBackend::default())))
    }

    async fn status_of(app: Router, request: Request<Body>) -> StatusCode {
        app.oneshot(request).await.unwrap().status()
    }

    fn create_session() -> axum::http::request::Builder {
        Request::post("/api/v1/sessions")
    }

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        headers.insert(API_KEY_HEADER, "xyz".parse().unwrap());
        assert_eq!(presented_key(&headers), Some("abc"));

        headers.remove(header::AUTHORIZATION);
        assert_eq!(presented_key(&headers), Some("xyz"));
        assert_eq!(presented_key(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_missing_or_wrong_key_is_unauthorized() {
        let missing = create_session().body(Body::empty()).unwrap();
        assert_eq!(
            status_of(guarded_app(), missing).await,
            StatusCode::UNAUTHORIZED
        );

        let wrong = create_session()
            .header("authorization", "Bearer nope")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(guarded_app(), wrong).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_valid_key_passes() {
        let bearer = create_session()
            .header("authorization", "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(guarded_app(), bearer).await, StatusCode::CREATED);

        let apikey = create_session()
            .header("apikey", "s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(guarded_app(), apikey).await, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        assert_eq!(status_of(guarded_app(), request).await, StatusCode::OK);
    }
}
