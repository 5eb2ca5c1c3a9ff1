//! 사용자 API 라우트.
//!
//! Bearer 인증이 필요한 계정 조회 엔드포인트를 제공합니다.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::repository::{UserDto, UserRepository};
use crate::state::AppState;

/// 현재 계정 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UserDto,
}

/// GET /api/me - 현재 인증된 계정 조회.
///
/// 신원은 Access Token에서 추출하며, 응답은 저장소의 현재 행을
/// 기준으로 합니다 (토큰 발급 이후 계정이 삭제되었으면 404).
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "현재 계정 정보", body = MeResponse),
        (status = 401, description = "인증 실패"),
        (status = 404, description = "계정 없음"),
    )
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let Some(dto) = UserRepository::find_public_by_id(&state.db_pool, user.user_id).await? else {
        return Err(ApiError::NotFound("User not found"));
    };

    Ok(Json(MeResponse { user: dto }))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}
