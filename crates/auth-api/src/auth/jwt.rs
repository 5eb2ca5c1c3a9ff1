//! JWT Access Token 처리.
//!
//! Access Token 생성/검증 로직. Refresh Token은 JWT가 아니라
//! 저장소 조회로만 유효성이 결정되는 불투명 문자열입니다 ([`super::token`]).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Access Token 페이로드.
///
/// 저장되지 않는 일시적 데이터입니다. 발급 시 생성되고 검증 시 소비됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - 사용자 ID (UUID 문자열)
    pub sub: String,
    /// 사용자 이메일
    pub email: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `email` - 사용자 이메일
    /// * `ttl_minutes` - 만료 시간 (분)
    pub fn new(user_id: Uuid, email: impl Into<String>, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        }
    }
}

/// JWT 토큰 에러.
///
/// 검증 실패는 원인(서명 위조 / 만료 / 형식 오류)과 무관하게 하나의
/// variant로 수렴합니다. 호출자가 실패 원인을 구분해 노출하면 토큰
/// 상태를 탐지하는 단서가 되기 때문입니다.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    InvalidOrExpired,
}

/// Access Token 생성.
///
/// # Arguments
///
/// * `claims` - JWT 페이로드
/// * `secret` - 서명 비밀 키 (시작 시 1회 로드, [`crate::config::AuthConfig`])
pub fn create_access_token(claims: &AccessClaims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// Access Token 디코딩 및 검증.
///
/// 서명과 만료 시간을 모두 검증합니다. 상태나 I/O 없이
/// (token, now, secret)만으로 결정되는 순수 함수입니다.
pub fn decode_access_token(token: &str, secret: &str) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::default();
    // 만료는 leeway 없이 정확한 시각 기준으로 판정
    validation.leeway = 0;

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| JwtError::InvalidOrExpired)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_user_id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn test_create_and_decode_token() {
        let user_id = test_user_id();
        let claims = AccessClaims::new(user_id, "a@b.com", 15);

        let token = create_access_token(&claims, TEST_SECRET).unwrap();
        assert!(!token.is_empty());

        let decoded = decode_access_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded.sub, user_id.to_string());
        assert_eq!(decoded.email, "a@b.com");
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        // 만료 시각 직후(초 단위)에도 즉시 거부되어야 함
        let now = Utc::now();
        let claims = AccessClaims {
            sub: test_user_id().to_string(),
            email: "a@b.com".to_string(),
            iat: (now - Duration::minutes(15)).timestamp(),
            exp: (now - Duration::seconds(30)).timestamp(),
        };

        let token = create_access_token(&claims, TEST_SECRET).unwrap();
        let result = decode_access_token(&token, TEST_SECRET);
        assert!(matches!(result, Err(JwtError::InvalidOrExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = AccessClaims::new(test_user_id(), "a@b.com", 15);
        let token = create_access_token(&claims, TEST_SECRET).unwrap();

        let result = decode_access_token(&token, "wrong-secret-key-for-testing-minimum-32");
        assert!(matches!(result, Err(JwtError::InvalidOrExpired)));
    }

    #[test]
    fn test_tampered_and_expired_indistinguishable() {
        // 위조된 토큰과 만료된 토큰이 동일한 에러로 수렴하는지 확인
        let now = Utc::now();
        let expired = AccessClaims {
            sub: test_user_id().to_string(),
            email: "a@b.com".to_string(),
            iat: (now - Duration::minutes(15)).timestamp(),
            exp: (now - Duration::seconds(30)).timestamp(),
        };
        let expired_token = create_access_token(&expired, TEST_SECRET).unwrap();

        let expired_err = decode_access_token(&expired_token, TEST_SECRET).unwrap_err();
        let tampered_err = decode_access_token("invalid.token.here", TEST_SECRET).unwrap_err();

        assert_eq!(expired_err.to_string(), tampered_err.to_string());
    }
}
