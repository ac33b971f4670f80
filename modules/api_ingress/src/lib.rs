//! HTTP host of the address book server.
//!
//! Module routers are merged into one axum router, wrapped with the shared
//! middleware stack and served until the cancellation token fires.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{http::StatusCode, middleware::from_fn, routing::get, Extension, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;
pub use web::HealthCheck;

/// Owns the HTTP listener and the cross-cutting middleware.
pub struct ApiIngress {
    config: ApiIngressConfig,
    health: Option<Arc<dyn HealthCheck>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            health: None,
        }
    }

    /// Enable `GET /api/healthchecker` backed by the given probe.
    #[must_use]
    pub fn with_health_check(mut self, probe: Arc<dyn HealthCheck>) -> Self {
        self.health = Some(probe);
        self
    }

    /// Merge module routes with the host endpoints and apply the middleware stack.
    pub fn build_router(&self, modules: Router) -> Router {
        let mut router = modules
            .route("/health", get(web::health_check))
            .route("/healthz", get(|| async { "ok" }));

        if let Some(probe) = &self.health {
            router = router.route(
                "/api/healthchecker",
                get(web::healthchecker).layer(Extension(probe.clone())),
            );
        }

        // Outermost first: SetRequestId -> PropagateRequestId -> Trace ->
        // push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit
        let x_request_id = request_id::header();

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.request_timeout_sec),
            ))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::make_span)
                    .on_response(request_id::record_response),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()));

        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind, serve until `cancel` fires, then drain in-flight requests.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.config.bind_addr))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully");
        };

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_routes_are_mounted() {
        let ingress = ApiIngress::new(ApiIngressConfig::default());
        let app = ingress.build_router(Router::new());

        let res = app
            .clone()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthchecker_absent_without_probe() {
        let app = ApiIngress::new(ApiIngressConfig::default()).build_router(Router::new());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/healthchecker")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serve_rejects_bad_bind_address() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            bind_addr: "not-an-address".to_owned(),
            ..Default::default()
        });
        let err = ingress
            .serve(Router::new(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid bind address"));
    }

    #[tokio::test]
    async fn slow_handlers_time_out_with_408() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            request_timeout_sec: 1,
            ..Default::default()
        });
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );

        let res = ingress
            .build_router(slow)
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
