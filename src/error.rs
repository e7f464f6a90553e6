//! Error Handling Module
//!
//! Provides type-safe error handling with proper HTTP status code mapping.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API 에러 타입
///
/// # Design Decision
///
/// 각 에러 variant는 적절한 HTTP 상태 코드에 매핑됨
/// - 클라이언트 에러: 4xx (잘못된 요청, 인증 실패, 없는 리소스)
/// - 서버 에러: 5xx (스토어/내부 오류)
///
/// "결과 없음"과 "스토어 장애"는 서로 다른 상태 코드로 구분한다.
/// 빈 검색 결과는 에러가 아니라 200 + 빈 리스트다.
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ 400 Bad Request ============
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ============ 401 / 403 Authorization ============
    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token required")]
    TokenMissing,

    // ============ 404 Not Found ============
    #[error("Resource not found: {0}")]
    NotFound(String),

    // ============ 500 Internal Server Error ============
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    InternalError,
}

/// API 에러 응답 구조
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // 4xx 클라이언트 에러
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            ApiError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(msg.clone()),
            ),
            ApiError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                "Incorrect token, please verify and use a correct token".to_string(),
                None,
            ),
            ApiError::TokenMissing => (
                StatusCode::FORBIDDEN,
                "TOKEN_MISSING",
                "Please enter your token or visit your profile to get your access token"
                    .to_string(),
                None,
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", resource),
                None,
            ),

            // 5xx 서버 에러
            ApiError::DatabaseError(_) => {
                // 내부 에러는 클라이언트에 상세 정보 노출 안 함
                tracing::error!("Database error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error occurred".to_string(),
                    None,
                )
            }
            ApiError::InternalError => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// 리포지토리(anyhow) 에러를 ApiError로 변환
///
/// 리포지토리 trait은 anyhow::Result를 반환하므로, 핸들러에서 `?`로
/// 전파된 스토어 에러는 전부 500-class로 매핑된다.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Repository error: {:?}", err);
        ApiError::DatabaseError(err.to_string())
    }
}
