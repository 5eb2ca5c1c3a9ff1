//! 인증 API 라우트.
//!
//! 계정 등록, 로그인, 토큰 재발급을 제공합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/auth/register` - 계정 등록 + 토큰 쌍 발급
//! - `POST /api/auth/login` - 로그인 + 토큰 쌍 발급
//! - `POST /api/auth/refresh` - Refresh Token 회전 재발급
//!
//! 각 연산은 호출자 관점에서 원자적이며, 실패는 전부 요청 단위로
//! 종결됩니다 (재시도 없음).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    create_access_token, generate_refresh_token, hash_password, verify_password, AccessClaims,
};
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_login, record_registration, record_token_refresh};
use crate::repository::{RefreshTokenRepository, UserDto, UserRepository};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 계정 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 이메일 (unique)
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    /// 비밀번호 (최소 8자)
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// 토큰 재발급 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// 토큰 쌍 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// 서명된 단기 Access Token (JWT)
    pub access_token: String,
    /// 불투명 장기 Refresh Token (1회용)
    pub refresh_token: String,
}

/// 등록/로그인 응답 (계정 + 토큰 쌍).
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

// ================================================================================================
// Session issuance
// ================================================================================================

/// 요청 본문 추출 + 검증.
///
/// 본문 파싱 실패와 필드 검증 실패를 모두 400으로 수렴시킵니다.
fn validated_body<T: Validate>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(req)
}

/// Access/Refresh 토큰 쌍 발급 + Refresh 행 저장.
///
/// 등록과 로그인이 공유하는 경로입니다. 사용자당 동시 세션 수를
/// 제한하지 않으므로 기존 Refresh Token은 건드리지 않습니다.
async fn issue_session(state: &AppState, user_id: Uuid, email: &str) -> ApiResult<TokenResponse> {
    let claims = AccessClaims::new(user_id, email, state.auth.access_ttl_minutes);
    let access_token = create_access_token(&claims, &state.auth.jwt_secret).map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ApiError::Internal("Failed to generate access token")
    })?;

    let refresh_token = generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.auth.refresh_ttl_days);

    RefreshTokenRepository::insert(&state.db_pool, user_id, &refresh_token, expires_at).await?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
    })
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /api/auth/register - 계정 등록.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "계정 생성 및 토큰 쌍 발급", body = AuthResponse),
        (status = 400, description = "본문 형식/검증 오류"),
        (status = 409, description = "이미 등록된 이메일"),
        (status = 500, description = "내부 오류"),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let req = validated_body(body)?;

    if UserRepository::email_exists(&state.db_pool, &req.email).await? {
        return Err(ApiError::Conflict("Email already registered"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ApiError::Internal("Failed to hash password")
    })?;

    let user = UserRepository::create(&state.db_pool, &req.email, &password_hash).await?;

    let tokens = issue_session(&state, user.id, &user.email).await?;

    record_registration();
    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserDto::from(&user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// POST /api/auth/login - 로그인.
///
/// 미등록 이메일과 비밀번호 불일치는 동일한 응답을 반환합니다
/// (계정 탐지 방지).
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "인증 성공, 토큰 쌍 발급", body = AuthResponse),
        (status = 400, description = "본문 형식/검증 오류"),
        (status = 401, description = "이메일 또는 비밀번호 불일치"),
        (status = 500, description = "내부 오류"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let req = validated_body(body)?;

    let Some(user) = UserRepository::find_by_email(&state.db_pool, &req.email).await? else {
        record_login("failure");
        return Err(ApiError::Authentication("Invalid email or password"));
    };

    if verify_password(&req.password, &user.password_hash).is_err() {
        record_login("failure");
        return Err(ApiError::Authentication("Invalid email or password"));
    }

    let tokens = issue_session(&state, user.id, &user.email).await?;

    record_login("success");
    debug!(user_id = %user.id, "User logged in");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserDto::from(&user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// POST /api/auth/refresh - Refresh Token 회전 재발급.
///
/// 제시된 토큰은 소비되며 같은 값으로 두 번째 호출은 실패합니다.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "새 토큰 쌍 발급", body = TokenResponse),
        (status = 400, description = "본문 형식/검증 오류"),
        (status = 401, description = "무효 또는 만료된 Refresh Token"),
        (status = 500, description = "내부 오류"),
    )
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let req = validated_body(body)?;

    let Some(stored) =
        RefreshTokenRepository::find_by_token(&state.db_pool, &req.refresh_token).await?
    else {
        record_token_refresh("invalid");
        return Err(ApiError::Authentication("Invalid refresh token"));
    };

    // 지연 만료: 만료된 행은 제시된 시점에 정리
    if stored.is_expired_at(Utc::now()) {
        if let Err(e) = RefreshTokenRepository::delete_by_id(&state.db_pool, stored.id).await {
            warn!(error = %e, token_id = %stored.id, "Failed to delete expired refresh token");
        }
        record_token_refresh("expired");
        return Err(ApiError::Authentication("Refresh token expired"));
    }

    // 유효한 미만료 토큰의 소유자는 반드시 존재해야 함 (무결성 가정)
    let Some(email) = UserRepository::find_email_by_id(&state.db_pool, stored.user_id).await?
    else {
        error!(user_id = %stored.user_id, "Refresh token owner missing");
        return Err(ApiError::Internal("User not found"));
    };

    let claims = AccessClaims::new(stored.user_id, &email, state.auth.access_ttl_minutes);
    let access_token = create_access_token(&claims, &state.auth.jwt_secret).map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ApiError::Internal("Failed to generate access token")
    })?;

    let new_refresh_token = generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.auth.refresh_ttl_days);

    // 단일 트랜잭션 회전: 경쟁 요청이 먼저 소비했다면 무효 토큰으로 처리
    RefreshTokenRepository::rotate(
        &state.db_pool,
        stored.id,
        stored.user_id,
        &new_refresh_token,
        expires_at,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            record_token_refresh("invalid");
            ApiError::Authentication("Invalid refresh token")
        }
        e => e.into(),
    })?;

    record_token_refresh("success");
    debug!(user_id = %stored.user_id, "Refresh token rotated");

    Ok(Json(TokenResponse {
        access_token,
        refresh_token: new_refresh_token,
    }))
}

// ================================================================================================
// Router
// ================================================================================================

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}
