//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (서버 + DB)
//! - `/api/auth/register` - 계정 등록
//! - `/api/auth/login` - 로그인
//! - `/api/auth/refresh` - 토큰 재발급
//! - `/api/me` - 현재 계정 조회 (Bearer 인증)

pub mod auth;
pub mod health;
pub mod users;

pub use auth::{auth_router, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenResponse};
pub use health::{health_router, HealthResponse};
pub use users::{users_router, MeResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .nest("/api/auth", auth_router())
        .merge(users_router())
}
