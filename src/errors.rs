use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

/// API 错误响应模型，用于 OpenAPI 文档
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 错误信息
    #[schema(example = "找不到该图片")]
    pub error: String,
    /// HTTP 状态码
    #[schema(example = 404)]
    pub status: u16,
}

#[derive(Error, Debug, ToSchema, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Verification unavailable: {0}")]
    VerificationUnavailable(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Storage failed: {0}")]
    Storage(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Database(msg) => {
                tracing::error!("数据库错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "数据库错误".to_string(),
                )
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Authorization(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::VerificationFailed(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::VerificationUnavailable(msg) => {
                tracing::error!("人机验证服务不可用: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            ApiError::Generation(msg) => {
                tracing::error!("图片生成失败: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::Storage(msg) => {
                tracing::error!("对象存储操作失败: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("内部错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部服务器错误".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// From implementations for compatibility
impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            status_of(ApiError::NotFound("missing".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Authentication("no token".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Authorization("not admin".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::VerificationFailed("bad token".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::VerificationUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ApiError::Generation("no image".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ApiError::Storage("put failed".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ApiError::Conflict("already set".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_error_message_is_not_leaked() {
        let response = ApiError::Database("secret dsn".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
