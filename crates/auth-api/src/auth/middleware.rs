//! Axum용 인증 추출기.
//!
//! 보호된 라우트 앞에서 `Authorization: Bearer <token>` 헤더를 검증하고,
//! 검증된 신원을 타입으로 핸들러에 전달합니다. untyped context 조회 대신
//! [`AuthUser`] 구조체가 인증된 요청임을 타입 수준에서 보장합니다.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::jwt::decode_access_token;
use crate::config::AuthConfig;

/// 인증된 요청의 신원.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthUser) -> impl IntoResponse {
///     format!("Authenticated user: {}", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// 사용자 ID
    pub user_id: Uuid,
    /// 사용자 이메일
    pub email: String,
}

/// 인증 게이트 에러.
///
/// 토큰 검증 실패는 위조/만료를 구분하지 않고 하나의 메시지로 응답합니다.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,
    #[error("Invalid authorization header format")]
    InvalidHeaderFormat,
    #[error("Invalid or expired auth token")]
    InvalidToken,
}

impl AuthError {
    fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "MISSING_AUTH_HEADER",
            AuthError::InvalidHeaderFormat => "INVALID_AUTH_HEADER",
            AuthError::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// `Authorization` 헤더에서 Bearer 토큰 추출.
///
/// 공백으로 나눈 결과가 정확히 두 부분이고 scheme이 `Bearer`여야 합니다.
fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AuthError::InvalidHeaderFormat);
    }
    Ok(parts[1])
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthConfig: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // 헤더 부재와 헤더 손상(비 UTF-8)은 별개의 에러
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidHeaderFormat)?;

        let token = parse_bearer(auth_header)?;

        let config = AuthConfig::from_ref(state);
        let claims = decode_access_token(token, &config.jwt_secret)
            .map_err(|_| AuthError::InvalidToken)?;

        // sub은 UUID 문자열이어야 함 - 아니라면 이 서버가 발급한 토큰이 아님
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_access_token, AccessClaims};
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 30,
        }
    }

    fn test_app() -> Router {
        async fn protected(user: AuthUser) -> String {
            format!("{}|{}", user.user_id, user.email)
        }

        Router::new()
            .route("/protected", get(protected))
            .with_state(test_config())
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc"), Ok("abc"));
        assert_eq!(parse_bearer("Token abc"), Err(AuthError::InvalidHeaderFormat));
        assert_eq!(parse_bearer("Bearer"), Err(AuthError::InvalidHeaderFormat));
        assert_eq!(
            parse_bearer("Bearer abc def"),
            Err(AuthError::InvalidHeaderFormat)
        );
        assert_eq!(parse_bearer(""), Err(AuthError::InvalidHeaderFormat));
    }

    #[tokio::test]
    async fn test_missing_header() {
        let request = Request::builder()
            .uri("/protected")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        assert!(body.contains("Missing authorization header"));
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        let request = Request::builder()
            .uri("/protected")
            .header(AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        assert!(body.contains("Invalid authorization header format"));
    }

    #[tokio::test]
    async fn test_non_utf8_header_is_format_error() {
        // 헤더가 존재하지만 UTF-8이 아닌 경우: 부재가 아니라 형식 오류
        let request = Request::builder()
            .uri("/protected")
            .header(
                AUTHORIZATION,
                axum::http::HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
            )
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        assert!(body.contains("Invalid authorization header format"));
        assert!(!body.contains("Missing authorization header"));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let request = Request::builder()
            .uri("/protected")
            .header(AUTHORIZATION, "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        assert!(body.contains("Invalid or expired auth token"));
    }

    #[tokio::test]
    async fn test_valid_token_passes_identity() {
        let user_id = Uuid::new_v4();
        let claims = AccessClaims::new(user_id, "a@b.com", 15);
        let token = create_access_token(&claims, TEST_SECRET).unwrap();

        let request = Request::builder()
            .uri("/protected")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // 핸들러가 올바른 user_id/email을 관찰하는지 확인
        let body = body_string(response).await;
        assert_eq!(body, format!("{user_id}|a@b.com"));
    }

    #[tokio::test]
    async fn test_non_uuid_subject_rejected() {
        let claims = AccessClaims {
            sub: "not-a-uuid".to_string(),
            email: "a@b.com".to_string(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 900,
        };
        let token = create_access_token(&claims, TEST_SECRET).unwrap();

        let request = Request::builder()
            .uri("/protected")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
