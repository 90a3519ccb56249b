//! Judge0 HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{BackendError, BackendResponse, BackendSubmission, ExecutionBackend};
use crate::config::Judge0Config;

/// Synchronous (`wait=true`) submissions against a Judge0 deployment
#[derive(Debug, Clone)]
pub struct Judge0Client {
    client: Client,
    submissions_url: String,
    api_key: String,
    api_host: String,
}

impl Judge0Client {
    pub fn new(config: &Judge0Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            submissions_url: format!(
                "{}/submissions?base64_encoded=false&wait=true",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }

    fn classify(status: StatusCode, body: String) -> BackendError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                BackendError::BadRequest(body)
            }
            other => BackendError::Status(other.as_u16(), body),
        }
    }
}

#[async_trait]
impl ExecutionBackend for Judge0Client {
    async fn submit(&self, submission: &BackendSubmission) -> Result<BackendResponse, BackendError> {
        let response = self
            .client
            .post(&self.submissions_url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Transport("backend request timed out".to_string())
                } else {
                    BackendError::Transport(format!("backend request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Execution backend returned an error");
            return Err(Self::classify(status, body));
        }

        response
            .json::<BackendResponse>()
            .await
            .map_err(|e| BackendError::Transport(format!("invalid backend response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::post,
    };
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr, timeout_secs: u64) -> Judge0Client {
        Judge0Client::new(&Judge0Config {
            base_url: format!("http://{}/", addr),
            api_key: "secret-key".to_string(),
            api_host: "judge0.test".to_string(),
            timeout_secs,
            language_ids: HashMap::new(),
        })
        .unwrap()
    }

    fn submission() -> BackendSubmission {
        BackendSubmission {
            source_code: "print('hi')".to_string(),
            language_id: 71,
            stdin: String::new(),
            expected_output: None,
        }
    }

    async fn respond_with(status: AxumStatus) -> Result<BackendResponse, BackendError> {
        let app = Router::new().route(
            "/submissions",
            post(move || async move { (status, "backend said no") }),
        );
        let addr = serve(app).await;
        client_for(addr, 5).submit(&submission()).await
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let app = Router::new().route(
            "/submissions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorised = headers.get("x-rapidapi-key").and_then(|v| v.to_str().ok())
                    == Some("secret-key")
                    && headers.get("x-rapidapi-host").and_then(|v| v.to_str().ok())
                        == Some("judge0.test");
                if !authorised {
                    return (AxumStatus::UNAUTHORIZED, Json(json!({})));
                }
                (
                    AxumStatus::CREATED,
                    Json(json!({
                        "stdout": format!("{}\n", body["language_id"]),
                        "time": "0.010",
                        "memory": 2048,
                        "status": {"id": 3, "description": "Accepted"}
                    })),
                )
            }),
        );
        let addr = serve(app).await;

        let response = client_for(addr, 5).submit(&submission()).await.unwrap();
        assert_eq!(response.stdout.as_deref(), Some("71\n"));
        assert_eq!(response.time, Some(json!("0.010")));
        assert_eq!(
            response.status.and_then(|s| s.description).as_deref(),
            Some("Accepted")
        );
    }

    #[tokio::test]
    async fn test_status_classification() {
        assert_eq!(
            respond_with(AxumStatus::UNAUTHORIZED).await,
            Err(BackendError::Unauthorized)
        );
        assert_eq!(
            respond_with(AxumStatus::FORBIDDEN).await,
            Err(BackendError::Unauthorized)
        );
        assert_eq!(
            respond_with(AxumStatus::TOO_MANY_REQUESTS).await,
            Err(BackendError::RateLimited)
        );
        assert_eq!(
            respond_with(AxumStatus::UNPROCESSABLE_ENTITY).await,
            Err(BackendError::BadRequest("backend said no".to_string()))
        );
        assert_eq!(
            respond_with(AxumStatus::BAD_GATEWAY).await,
            Err(BackendError::Status(502, "backend said no".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(addr, 5).submit(&submission()).await;
        assert!(matches!(result, Err(BackendError::Transport(_))));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let app = Router::new().route(
            "/submissions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"stdout": "late"}))
            }),
        );
        let addr = serve(app).await;

        let result = client_for(addr, 1).submit(&submission()).await;
        assert_eq!(
            result,
            Err(BackendError::Transport("backend request timed out".to_string()))
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_transport_error() {
        let app = Router::new().route("/submissions", post(|| async { "not json" }));
        let addr = serve(app).await;

        let result = client_for(addr, 5).submit(&submission()).await;
        assert!(matches!(result, Err(BackendError::Transport(_))));
    }
}
