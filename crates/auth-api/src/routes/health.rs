//! 헬스 체크 endpoint.
//!
//! 서버와 데이터베이스 상태 확인을 제공합니다.
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("ok" | "error")
    pub status: String,

    /// 데이터베이스 연결 상태 ("connected" | "unreachable")
    pub database: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,
}

/// 헬스 체크.
///
/// 데이터베이스 연결까지 확인합니다. 저장소가 없으면 토큰 발급도
/// 불가능하므로 이 서비스의 liveness와 readiness는 사실상 같습니다.
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "서비스 정상", body = HealthResponse),
        (status = 500, description = "데이터베이스 연결 실패", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db_pool)
        .await
        .is_ok();

    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();

    if db_ok {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "connected".to_string(),
                version: state.version.clone(),
                uptime_secs,
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "error".to_string(),
                database: "unreachable".to_string(),
                version: state.version.clone(),
                uptime_secs,
            }),
        )
    }
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            database: "connected".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""status":"ok""#));
        assert!(json.contains(r#""database":"connected""#));
        assert!(json.contains(r#""uptime_secs":42"#));
    }
}
