//! 통합 API 에러 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "CONFLICT",
//!     "message": "Email already registered"
//!   }
//! }
//! ```
//!
//! 인증 실패 메시지는 의도적으로 포괄적입니다. "이메일 없음"과
//! "비밀번호 불일치"를 구분해 응답하면 등록된 계정을 탐지할 수 있기
//! 때문에, 두 경우 모두 동일한 응답을 반환합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API 에러 타입.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 요청 본문 누락/형식 오류 (400)
    #[error("{0}")]
    Validation(String),

    /// 자격 증명 또는 토큰 오류 (401) - 메시지는 항상 포괄적
    #[error("{0}")]
    Authentication(&'static str),

    /// 리소스 중복 (409)
    #[error("{0}")]
    Conflict(&'static str),

    /// 리소스 없음 (404)
    #[error("{0}")]
    NotFound(&'static str),

    /// 내부 오류 (500) - 원본 에러는 로그로만 남기고 응답에는 노출하지 않음
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// 이 에러의 HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 이 에러의 기계 판독용 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Authentication(_) => "AUTHENTICATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (self.status_code(), body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // 원본 SQL 에러는 응답으로 새지 않도록 여기서만 기록
        error!(error = %e, "Database error");
        ApiError::Internal("Database error")
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad body".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Authentication("Invalid email or password").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Conflict("Email already registered").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NotFound("User not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("Database error").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::Conflict("dup").code(), "CONFLICT");
        assert_eq!(
            ApiError::Authentication("no").code(),
            "AUTHENTICATION_ERROR"
        );
        assert_eq!(ApiError::Internal("boom").code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Conflict("Email already registered").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_sqlx_error_sanitized() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        // 내부 에러 상세가 아닌 포괄 메시지만 노출
        assert_eq!(err.to_string(), "Database error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
