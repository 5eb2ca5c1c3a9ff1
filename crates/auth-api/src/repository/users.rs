//! User Repository
//!
//! 계정(users 테이블) 관련 데이터베이스 연산을 담당합니다.
//! 계정은 등록 시 생성되며 이후 변경 경로가 없습니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 계정 레코드 (password_hash 포함, 내부 전용).
///
/// 응답으로 직렬화하지 않습니다. API 응답에는 [`UserDto`]를 사용하세요.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 계정 공개 표현.
///
/// password_hash가 아예 없는 타입이므로 직렬화 누출이 불가능합니다.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserDto {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            created_at: record.created_at,
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// 이메일 등록 여부 확인.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// 계정 생성.
    ///
    /// ID는 애플리케이션에서 생성합니다. 이메일 unique 제약 위반은
    /// `sqlx::Error`로 전파됩니다.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 이메일로 계정 조회 (로그인용, 해시 포함).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// ID로 계정 공개 정보 조회.
    pub async fn find_public_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<UserDto>, sqlx::Error> {
        let record = sqlx::query_as::<_, UserDto>(
            "SELECT id, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// ID로 이메일 조회 (Refresh Token 소유자 해석용).
    pub async fn find_email_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<String>, sqlx::Error> {
        let email: Option<String> = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(email)
    }
}
