//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod execute;
pub mod health;
pub mod submissions;

use axum::{
    http::{header, HeaderValue},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer};

use crate::{
    constants::MAX_REQUEST_BODY_BYTES,
    middleware::{identity_middleware, logging_middleware},
    state::AppState,
};

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(execute::routes())
        .nest("/submissions", submissions::routes())
}

/// The `/api/v1` application with caller identification, request logging
/// and browser hardening headers
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_XSS_PROTECTION,
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::STRICT_TRANSPORT_SECURITY,
                    HeaderValue::from_static("max-age=31536000"),
                )),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        backend::{BackendResponse, BackendStatus, MockExecutionBackend},
        config::{
            default_language_ids, AuthConfig, Config, DatabaseConfig, Judge0Config, LimitsConfig,
            SanitizerConfig, ServerConfig,
        },
        db::repositories::InMemorySubmissionStore,
        middleware::auth::Claims,
        security::SanitizerRules,
    };

    const SECRET: &str = "router-secret";

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: Some(SECRET.to_string()),
            },
            judge0: Judge0Config {
                base_url: "http://judge0.invalid".to_string(),
                api_key: "key".to_string(),
                api_host: "judge0.invalid".to_string(),
                timeout_secs: 1,
                language_ids: default_language_ids(),
            },
            limits: LimitsConfig::default(),
            sanitizer: SanitizerConfig::default(),
        }
    }

    fn app() -> Router {
        let mut backend = MockExecutionBackend::new();
        backend.expect_submit().returning(|_| {
            Ok(BackendResponse {
                stdout: Some("hi\n".to_string()),
                time: Some(json!("0.25")),
                memory: Some(json!(900)),
                status: Some(BackendStatus {
                    id: Some(3),
                    description: Some("Accepted".to_string()),
                }),
                ..Default::default()
            })
        });

        let state = AppState::new(
            config(),
            &SanitizerRules::default(),
            Arc::new(backend),
            Arc::new(InMemorySubmissionStore::new()),
        )
        .unwrap();
        router(state)
    }

    fn bearer(sub: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    fn get(uri: &str, session: &str) -> Request<Body> {
        Request::get(uri)
            .header("x-session-id", session)
            .body(Body::empty())
            .unwrap()
    }

    fn execute(body: Value, session: &str) -> Request<Body> {
        Request::post("/api/v1/execute")
            .header("content-type", "application/json")
            .header("x-session-id", session)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_execute_returns_result_and_quota_headers() {
        let response = app()
            .oneshot(execute(
                json!({"code": "print('hi')", "language": "python", "input": "", "expectedOutput": "hi"}),
                "sess-1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["x-ratelimit-limit"], "100");
        assert_eq!(headers["x-ratelimit-remaining"], "99");
        assert_eq!(headers["x-session-id"], "sess-1");

        let body = json_body(response).await;
        assert_eq!(body["output"], "hi");
        assert_eq!(body["status"], "Accepted");
        assert_eq!(body["isCorrect"], true);
        assert_eq!(body["executionTimeMs"], 250.0);
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_rejection_is_a_structured_result() {
        let response = app()
            .oneshot(execute(json!({"code": "puts 1", "language": "ruby"}), "sess-1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "Error");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported language: ruby"));
    }

    #[tokio::test]
    async fn test_session_is_generated_when_absent() {
        let response = app()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let session = response.headers()["x-session-id"].to_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&session).is_ok());

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["history_store"], "memory");
    }

    #[tokio::test]
    async fn test_languages_and_limits() {
        let app = app();

        let response = app
            .clone()
            .oneshot(get("/api/v1/languages", "sess-1"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["python"], "Python (3.8.1)");
        assert_eq!(body.as_object().unwrap().len(), 6);

        let response = app.oneshot(get("/api/v1/limits", "sess-1")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["remainingRequests"], 100);
        assert_eq!(body["limits"]["timeoutMs"], 10_000);
        assert_eq!(body["limits"]["maxMemoryMb"], 100);
    }

    #[tokio::test]
    async fn test_history_is_scoped_to_session() {
        let app = app();
        app.clone()
            .oneshot(execute(json!({"code": "print('hi')", "language": "python"}), "sess-1"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/api/v1/submissions?page=1&perPage=5", "sess-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["perPage"], 5);
        let id = body["submissions"][0]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/submissions/{id}"), "sess-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/submissions/{id}"), "sess-2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(get("/api/v1/submissions", "sess-2"))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["total"], 0);

        let response = app
            .oneshot(get("/api/v1/submissions/recent", "sess-2"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert!(body[0].get("code").is_none());
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let app = app();
        let requests = [
            get("/api/v1/health", "sess-1"),
            execute(json!({"code": "puts 1", "language": "ruby"}), "sess-1"),
            get("/api/v1/submissions/stats", "sess-1"),
        ];

        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            let headers = response.headers();
            assert_eq!(headers["x-content-type-options"], "nosniff");
            assert_eq!(headers["x-frame-options"], "DENY");
            assert_eq!(headers["x-xss-protection"], "1; mode=block");
            assert_eq!(headers["strict-transport-security"], "max-age=31536000");
        }
    }

    #[tokio::test]
    async fn test_anonymous_session_cannot_spend_account_quota() {
        let app = app();
        app.clone()
            .oneshot(execute(json!({"code": "print('hi')", "language": "python"}), "alice"))
            .await
            .unwrap();

        let request = Request::get("/api/v1/limits")
            .header("authorization", bearer("alice"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(json_body(response).await["remainingRequests"], 100);

        let response = app.oneshot(get("/api/v1/limits", "alice")).await.unwrap();
        assert_eq!(json_body(response).await["remainingRequests"], 99);
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_rejected() {
        let response = app()
            .oneshot(get("/api/v1/submissions?perPage=0", "sess-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_stats_require_an_account() {
        let app = app();

        let response = app
            .clone()
            .oneshot(get("/api/v1/submissions/stats", "sess-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::post("/api/v1/execute")
            .header("content-type", "application/json")
            .header("authorization", bearer("alice"))
            .body(Body::from(
                json!({"code": "print('hi')", "language": "python"}).to_string(),
            ))
            .unwrap();
        app.clone().oneshot(request).await.unwrap();

        let request = Request::get("/api/v1/submissions/stats")
            .header("authorization", bearer("alice"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["totalSubmissions"], 1);
        assert_eq!(body["successfulSubmissions"], 1);
        assert_eq!(body["successRate"], 100.0);
    }
}
