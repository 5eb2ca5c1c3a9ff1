//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다. 요청 처리 중
//! 변경되는 프로세스 내 상태는 없으며, 모든 변경은 데이터베이스에서
//! 일어납니다.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::AuthConfig;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub db_pool: PgPool,

    /// 토큰 발급/검증 설정 (시작 후 읽기 전용)
    pub auth: AuthConfig,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(db_pool: PgPool, auth: AuthConfig) -> Self {
        Self {
            db_pool,
            auth,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// AuthUser extractor가 AppState에서 인증 설정을 꺼낼 수 있도록 연결
impl FromRef<Arc<AppState>> for AuthConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}
