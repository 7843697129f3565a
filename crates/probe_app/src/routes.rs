//! HTTP binding for the analysis engine.
//!
//! ```text
//! POST /kickoff         - submit {url}, returns {jobId, status, statusUrl}
//! GET  /status/{job_id} - poll {status, result?, error?}
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use engine_logging::engine_debug;
use probe_core::{JobId, JobStatus};
use probe_engine::AnalysisEngine;
use serde::{Deserialize, Serialize};

pub fn router(engine: AnalysisEngine) -> Router {
    Router::new()
        .route("/kickoff", post(kickoff))
        .route("/status/{job_id}", get(status))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub struct KickoffRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KickoffResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub status_url: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

async fn kickoff(
    State(engine): State<AnalysisEngine>,
    Json(request): Json<KickoffRequest>,
) -> Response {
    let url = request.url.unwrap_or_default();
    match engine.submit(&url) {
        Ok(submission) => Json(KickoffResponse {
            job_id: submission.job_id,
            status: JobStatus::Processing,
            status_url: submission.status_url,
        })
        .into_response(),
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

async fn status(State(engine): State<AnalysisEngine>, Path(raw_id): Path<String>) -> Response {
    let state = raw_id
        .parse::<JobId>()
        .ok()
        .and_then(|job_id| engine.status(job_id));
    match state {
        Some(state) => Json(state.view()).into_response(),
        None => {
            engine_debug!("Status lookup for unknown job {:?}", raw_id);
            error_response(StatusCode::NOT_FOUND, "Job not found")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use probe_engine::{
        EngineConfig, HttpPage, NavigationError, NavigationFailure, PageHandle, PageLoader,
        ReleaseError,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    struct StaticLoader {
        pages: HashMap<&'static str, &'static str>,
    }

    #[async_trait::async_trait]
    impl PageLoader for StaticLoader {
        async fn load(&self, url: &str) -> Result<Box<dyn PageHandle>, NavigationError> {
            match self.pages.get(url) {
                Some(html) => Ok(Box::new(HttpPage::new(url, *html))),
                None => Err(NavigationError::new(
                    NavigationFailure::Network,
                    format!("could not resolve host for {url}"),
                )),
            }
        }

        async fn release(&self, _page: Box<dyn PageHandle>) -> Result<(), ReleaseError> {
            Ok(())
        }
    }

    fn test_engine() -> AnalysisEngine {
        let pages = HashMap::from([(
            "https://example.com",
            r#"<html><body>
                <a href="/">Home</a><a href="/about"></a>
                <button id="submit-btn">Go</button>
            </body></html>"#,
        )]);
        AnalysisEngine::new(Arc::new(StaticLoader { pages }), EngineConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn kickoff_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/kickoff")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn status_request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    async fn poll_until_terminal(app: &Router, path: &str) -> Value {
        for _ in 0..200 {
            let (code, body) = send(app.clone(), status_request(path)).await;
            assert_eq!(code, StatusCode::OK);
            if body["status"] != "processing" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job at {path} never finished");
    }

    #[tokio::test]
    async fn kickoff_then_poll_returns_completed_result() {
        let app = router(test_engine());

        let request = kickoff_request(json!({"url": "https://example.com"}));
        let (code, body) = send(app.clone(), request).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"], "processing");
        let job_id = body["jobId"].as_str().unwrap().to_string();
        assert_eq!(body["statusUrl"], format!("/status/{job_id}"));

        let done = poll_until_terminal(&app, &format!("/status/{job_id}")).await;
        assert_eq!(done["status"], "completed");
        assert!(done.get("error").is_none());
        let result = &done["result"];
        assert_eq!(result["url"], "https://example.com");
        assert_eq!(result["links"]["count"], 2);
        assert_eq!(result["icons"], json!({"count": 0, "items": []}));
        assert_eq!(
            result["locators"]["buttons"],
            json!([{"text": "Go", "css": "#submit-btn", "xpath": "//*[@id=\"submit-btn\"]"}])
        );

        // Terminal payloads do not change between polls.
        let again = poll_until_terminal(&app, &format!("/status/{job_id}")).await;
        assert_eq!(again, done);
    }

    #[tokio::test]
    async fn unreachable_url_reports_failure() {
        let app = router(test_engine());

        let request = kickoff_request(json!({"url": "https://nowhere.invalid"}));
        let (_, body) = send(app.clone(), request).await;
        let path = body["statusUrl"].as_str().unwrap().to_string();

        let done = poll_until_terminal(&app, &path).await;
        assert_eq!(done["status"], "failed");
        assert!(done.get("result").is_none());
        assert!(!done["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_or_empty_url_is_bad_request() {
        let engine = test_engine();
        let app = router(engine.clone());

        let (code, body) = send(app.clone(), kickoff_request(json!({}))).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "URL is required"}));

        let (code, _) = send(app, kickoff_request(json!({"url": ""}))).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(engine.store().is_empty());
    }

    #[tokio::test]
    async fn unknown_or_malformed_job_id_is_not_found() {
        let app = router(test_engine());

        let unknown = format!("/status/{}", JobId::new());
        let (code, body) = send(app.clone(), status_request(&unknown)).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Job not found"}));

        let (code, _) = send(app, status_request("/status/definitely-not-a-job")).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }
}
