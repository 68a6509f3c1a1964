//! 首页、健康检查和指标

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::http::state::AppState;

/// GET /
pub async fn home() -> &'static str {
    "API is working."
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<ServiceCheck>,
}

#[derive(Debug, Serialize)]
pub struct ServiceCheck {
    pub name: String,
    pub healthy: bool,
}

/// GET /ready
///
/// 任一依赖不可用时返回 503。
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = Vec::with_capacity(state.readiness.len());
    for probe in &state.readiness {
        let healthy = match probe.check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(probe = probe.name(), error = %e, "Readiness check failed");
                false
            }
        };
        checks.push(ServiceCheck {
            name: probe.name().to_string(),
            healthy,
        });
    }

    let ready = checks.iter().all(|c| c.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse { ready, checks }))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::api::http::state::MockReadinessProbe;
    use crate::api::http::{AppState, router};
    use crate::domain::repository::{
        MockOrderRepository, MockProductRepository, MockUserRepository,
    };
    use shop_config::ServerConfig;
    use shop_errors::AppError;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockProductRepository::new()),
            Arc::new(MockOrderRepository::new()),
        )
    }

    fn probe(healthy: bool) -> MockReadinessProbe {
        let mut probe = MockReadinessProbe::new();
        probe.expect_name().return_const("postgres");
        probe.expect_check().returning(move || {
            if healthy {
                Ok(())
            } else {
                Err(AppError::database("connection refused"))
            }
        });
        probe
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_home() {
        let (status, body) = get(router(state(), &ServerConfig::default()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"API is working.");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(router(state(), &ServerConfig::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready() {
        let app = router(
            state().with_readiness(Arc::new(probe(true))),
            &ServerConfig::default(),
        );
        let (status, body) = get(app, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ready"], true);
        assert_eq!(json["checks"][0]["name"], "postgres");
    }

    #[tokio::test]
    async fn test_not_ready() {
        let app = router(
            state().with_readiness(Arc::new(probe(false))),
            &ServerConfig::default(),
        );
        let (status, body) = get(app, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["checks"][0]["healthy"], false);
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let (status, _) = get(router(state(), &ServerConfig::default()), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
