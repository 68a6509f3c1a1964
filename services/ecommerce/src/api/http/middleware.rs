//! HTTP 指标中间件

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// 记录请求次数和耗时
///
/// 路由标签取匹配到的路由模板，未匹配的请求统一记为 `unmatched`，避免标签基数膨胀。
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    shop_telemetry::record_http_request(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
