use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::XRequestId;
use api_ingress::{ApiIngress, ApiIngressConfig, HealthCheck};

struct Probe(bool);

#[async_trait]
impl HealthCheck for Probe {
    async fn check(&self) -> anyhow::Result<()> {
        if self.0 {
            Ok(())
        } else {
            anyhow::bail!("connection refused")
        }
    }
}

fn test_app(db_up: bool) -> Router {
    let routes = Router::new().route("/test", get(echo_handler));
    ApiIngress::new(ApiIngressConfig::default())
        .with_health_check(Arc::new(Probe(db_up)))
        .build_router(routes)
}

async fn echo_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "request_id": request_id}))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = test_app(true)
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header_id.is_empty());

    let json = body_json(response).await;
    assert_eq!(json["request_id"], header_id.as_str());
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = test_app(true)
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok());
    assert_eq!(request_id, Some("abc-123"));
}

#[tokio::test]
async fn healthchecker_welcomes_when_store_is_reachable() {
    let response = test_app(true)
        .oneshot(
            Request::builder()
                .uri("/api/healthchecker")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Welcome to the address book API!");
}

#[tokio::test]
async fn healthchecker_reports_problem_when_store_is_down() {
    let response = test_app(false)
        .oneshot(
            Request::builder()
                .uri("/api/healthchecker")
                .header("x-request-id", "hc-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some(problem_details::APPLICATION_PROBLEM_JSON)
    );
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("hc-1")
    );

    let json = body_json(response).await;
    assert_eq!(json["status"], 500);
    assert_eq!(json["detail"], "Error connecting to the database");
    assert_eq!(json["instance"], "/api/healthchecker");
}

#[tokio::test]
async fn health_reports_status_and_timestamp() {
    let response = test_app(true)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}
