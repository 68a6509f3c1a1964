//! HTTP 错误响应

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use shop_errors::{AppError, FieldErrors};
use tracing::{error, warn};

use super::dto::MessageResponse;

/// 将 `AppError` 转换为 HTTP 响应
///
/// - 字段校验失败: 400，响应体为字段到错误信息的映射
/// - 其他客户端错误: 对应状态码，`{"message": ...}`
/// - 服务端错误: RFC 7807 Problem Details
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self(AppError::InvalidFields(errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self.0 {
            AppError::InvalidFields(fields) => {
                warn!(errors = %fields, "Request body rejected");
                (status, Json(fields)).into_response()
            }
            err if err.is_server_error() => {
                error!(error = %err, "Request failed");
                let problem = err.to_problem_details();
                (
                    status,
                    [(header::CONTENT_TYPE, "application/problem+json")],
                    Json(problem),
                )
                    .into_response()
            }
            err => {
                warn!(status = status.as_u16(), error = %err, "Request rejected");
                (status, Json(MessageResponse::new(err.message()))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_field_errors_are_plain_map() {
        let response = ApiError::from(FieldErrors::single("email", "Missing data for required field."))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"email": ["Missing data for required field."]})
        );
    }

    #[tokio::test]
    async fn test_client_error_has_message() {
        let response = ApiError::from(AppError::not_found("User not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({"message": "User not found"}));
    }

    #[tokio::test]
    async fn test_conflict_status() {
        let response = ApiError::from(AppError::conflict("dup")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_server_error_is_problem_details() {
        let response = ApiError::from(AppError::database("connection reset")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        let body = body_json(response).await;
        assert_eq!(body["status"], 500);
        assert_eq!(body["title"], "Database Error");
    }
}
