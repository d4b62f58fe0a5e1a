pub mod health;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::analysis::handlers;
use crate::errors::{error_response, panic_message};
use crate::state::AppState;

/// Room for multipart framing and the text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Panics become the standard 500 envelope instead of a dropped connection.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload);
    tracing::error!("Handler panicked: {message}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resume/analyze", post(handlers::handle_analyze))
        .route(
            "/api/resume/analyze/jobrole",
            post(handlers::handle_analyze_jobrole),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::suggestions::fallback_suggestions;
    use crate::config::{Config, LlmConfig, LlmProvider};
    use crate::extraction::fixtures::build_pdf;
    use crate::llm_client::ScriptedCompletion;

    const BOUNDARY: &str = "reviewer-test-boundary";
    const SAMPLE: &str = "Experienced Software Engineer. Improved system performance by 40%. \
        Led team of 5 developers using Python, Docker, and Kubernetes.";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a [u8]),
    }

    fn app_with(llm: ScriptedCompletion, max_upload_bytes: usize) -> Router {
        build_router(AppState {
            llm: Arc::new(llm),
            config: Config {
                port: 0,
                rust_log: "debug".to_string(),
                llm: LlmConfig {
                    provider: LlmProvider::Anthropic,
                    api_key: None,
                    timeout: Duration::from_secs(1),
                },
                max_upload_bytes,
            },
        })
    }

    fn app() -> Router {
        app_with(ScriptedCompletion::failing(), 1024 * 1024)
    }

    fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], health::SERVICE_NAME);
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_analyze_text() {
        let request = multipart_request("/api/resume/analyze", &[Part::Text("text", SAMPLE)]);
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 29);
        assert_eq!(body["buzzwords"], serde_json::json!(["python", "docker", "kubernetes"]));
        assert_eq!(body["matchedRoles"][0]["title"], "DevOps Engineer");
        assert_eq!(body["matchedRoles"][0]["applyUrl"], "https://example.com/job4");
        assert_eq!(
            body["suggestions"],
            serde_json::to_value(fallback_suggestions()).unwrap()
        );
        assert_eq!(body["charts"]["skillsCoverage"]["Technical"], 40);
        assert!(body["charts"]["keywordDensity"].is_object());
    }

    #[tokio::test]
    async fn test_analyze_txt_upload_uses_model_suggestions() {
        let llm = ScriptedCompletion::replying("1. One\n2. Two\n3. Three\n4. Four\n5. Five\n6. Six");
        let request = multipart_request(
            "/api/resume/analyze",
            &[Part::File("resume.txt", SAMPLE.as_bytes())],
        );
        let (status, body) = send(app_with(llm, 1024 * 1024), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 29);
        assert_eq!(
            body["suggestions"],
            serde_json::json!(["One", "Two", "Three", "Four", "Five"])
        );
    }

    #[tokio::test]
    async fn test_analyze_pdf_upload() {
        let pdf = build_pdf(&["Senior engineer using Python and Docker", "Ran Kubernetes clusters"]);
        let request = multipart_request("/api/resume/analyze", &[Part::File("resume.pdf", &pdf)]);
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        let buzzwords = body["buzzwords"].as_array().unwrap();
        for skill in ["python", "docker", "kubernetes"] {
            assert!(buzzwords.contains(&Value::from(skill)), "missing {skill}");
        }
        assert_eq!(body["matchedRoles"][0]["title"], "DevOps Engineer");
    }

    #[tokio::test]
    async fn test_empty_txt_upload_is_analyzed() {
        let request = multipart_request("/api/resume/analyze", &[Part::File("resume.txt", b"")]);
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 0);
        assert_eq!(body["grammar"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_bodyless_post_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/resume/analyze")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad request");
        assert_eq!(body["message"], "Please provide either a file or text input");
    }

    #[tokio::test]
    async fn test_urlencoded_text_is_analyzed() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/resume/analyze/jobrole")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "text=Led+team+using+Python%2C+Docker%2C+and+Kubernetes.\
                 &jobDescription=Python+Docker+Kubernetes",
            ))
            .unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matchedRoles"][0]["title"], "DevOps Engineer");
        assert!(body["buzzwords"].as_array().unwrap().contains(&Value::from("docker")));
    }

    #[tokio::test]
    async fn test_missing_input_is_bad_request() {
        let request = multipart_request(
            "/api/resume/analyze",
            &[Part::Text("note", "ignored"), Part::Text("text", "   ")],
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please provide either a file or text input");
        assert_eq!(body["error"], "Bad request");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_bad_request() {
        let request = multipart_request(
            "/api/resume/analyze",
            &[Part::File("resume.xyz", b"whatever")],
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        for format in ["PDF", "DOCX", "TXT"] {
            assert!(message.contains(format));
        }
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_bad_request() {
        let request = multipart_request(
            "/api/resume/analyze",
            &[Part::File("resume.pdf", b"%PDF-1.4 truncated")],
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("Error reading PDF"));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_bad_request() {
        let request = multipart_request(
            "/api/resume/analyze",
            &[Part::File("resume.txt", &[b'a'; 64])],
        );
        let (status, body) = send(app_with(ScriptedCompletion::failing(), 16), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn test_jobrole_requires_job_description() {
        let request = multipart_request(
            "/api/resume/analyze/jobrole",
            &[Part::Text("text", SAMPLE)],
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("jobDescription"));
    }

    #[tokio::test]
    async fn test_jobrole_adds_job_match_points() {
        let request = multipart_request(
            "/api/resume/analyze/jobrole",
            &[
                Part::Text("text", SAMPLE),
                Part::Text("jobDescription", "Python Docker Kubernetes"),
            ],
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        // 29 base points plus a full 30-point overlap bonus
        assert_eq!(body["atsScore"], 59);
    }

    #[test]
    fn test_panic_maps_to_internal_error_envelope() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
