//! 계정 인증 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (등록/로그인/토큰 재발급)
//! - JWT Access Token + 회전식 Refresh Token 인증
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 비밀번호 해싱, JWT 발급/검증, Bearer 인증 extractor
//! - [`repository`]: 데이터베이스 접근 (users, refresh_tokens)
//! - [`tasks`]: 백그라운드 태스크 (만료 토큰 정리)
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;
pub mod tasks;

pub use auth::{
    create_access_token, decode_access_token, generate_refresh_token, hash_password,
    verify_password, AccessClaims, AuthError, AuthUser, JwtError, PasswordError,
};
pub use config::{AuthConfig, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::*;
pub use state::AppState;
pub use tasks::start_expired_token_sweeper;
