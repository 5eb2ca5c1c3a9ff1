//! Refresh Token Repository
//!
//! 발급된 Refresh Token(refresh_tokens 테이블)의 저장 계약을 담당합니다.
//!
//! 불변식: 토큰 값 하나당 유효한 사용은 최대 1회입니다. 소비(회전)되거나
//! 만료가 확인된 행은 삭제되며, 같은 값으로는 다시 인증할 수 없습니다.
//! `token` 컬럼의 unique 제약이 동시 회전 경합의 최후 방어선입니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// Refresh Token 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// 주어진 시각 기준 만료 여부.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// Refresh Token Repository
pub struct RefreshTokenRepository;

impl RefreshTokenRepository {
    /// 새 Refresh Token 행 삽입.
    pub async fn insert(
        pool: &PgPool,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 토큰 값으로 조회.
    ///
    /// 유효성 판단은 디코딩이 아니라 오직 이 조회로 결정됩니다.
    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, user_id, token, expires_at, created_at FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// ID로 행 삭제.
    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 단일 사용 회전: 이전 행 삭제 + 새 행 삽입을 한 트랜잭션으로 수행.
    ///
    /// 삭제와 삽입 사이에서 프로세스가 죽어도 세션이 유실되지 않으며,
    /// 같은 토큰으로 동시에 들어온 두 회전 요청 중 하나는 삭제된 행을
    /// 보지 못해 실패합니다 (`rows_affected == 0` → `RowNotFound`).
    pub async fn rotate(
        pool: &PgPool,
        old_id: Uuid,
        user_id: Uuid,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(old_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // 경쟁 회전이 먼저 소비함 - 이 요청은 무효
            return Err(sqlx::Error::RowNotFound);
        }

        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(new_token)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// 만료된 행 일괄 삭제 (백그라운드 정리용).
    ///
    /// # Returns
    ///
    /// 삭제된 행 수
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::users::UserRepository;
    use chrono::Duration;

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "abc".to_string(),
            expires_at: now - Duration::seconds(1),
            created_at: now - Duration::days(30),
        };

        assert!(record.is_expired_at(now));
        assert!(!record.is_expired_at(now - Duration::seconds(2)));
    }

    #[test]
    fn test_not_expired_at_exact_instant() {
        // 경계: expires_at 시각 자체는 아직 유효
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "abc".to_string(),
            expires_at: now,
            created_at: now,
        };

        assert!(!record.is_expired_at(now));
    }

    #[sqlx::test]
    async fn test_rotate_is_single_use(pool: PgPool) {
        let user = UserRepository::create(&pool, "rotate@test.com", "$argon2id$test-hash")
            .await
            .unwrap();
        let expires_at = Utc::now() + Duration::days(30);

        let original = RefreshTokenRepository::insert(&pool, user.id, "original-token", expires_at)
            .await
            .unwrap();

        let rotated = RefreshTokenRepository::rotate(
            &pool,
            original.id,
            user.id,
            "rotated-token",
            expires_at,
        )
        .await
        .unwrap();
        assert_eq!(rotated.token, "rotated-token");
        assert_eq!(rotated.user_id, user.id);

        // 소비된 값은 더 이상 조회되지 않음
        let stale = RefreshTokenRepository::find_by_token(&pool, "original-token")
            .await
            .unwrap();
        assert!(stale.is_none());

        // 이미 소비된 행 id로 두 번째 회전은 실패 (경쟁 회전의 패자 경로)
        let second = RefreshTokenRepository::rotate(
            &pool,
            original.id,
            user.id,
            "second-token",
            expires_at,
        )
        .await;
        assert!(matches!(second, Err(sqlx::Error::RowNotFound)));

        // 실패한 회전은 새 행을 남기지 않음 (트랜잭션 롤백)
        let leaked = RefreshTokenRepository::find_by_token(&pool, "second-token")
            .await
            .unwrap();
        assert!(leaked.is_none());
    }

    #[sqlx::test]
    async fn test_delete_expired_removes_only_expired_rows(pool: PgPool) {
        let user = UserRepository::create(&pool, "sweep@test.com", "$argon2id$test-hash")
            .await
            .unwrap();
        let now = Utc::now();

        RefreshTokenRepository::insert(&pool, user.id, "expired-token", now - Duration::hours(1))
            .await
            .unwrap();
        RefreshTokenRepository::insert(&pool, user.id, "live-token", now + Duration::days(30))
            .await
            .unwrap();

        let swept = RefreshTokenRepository::delete_expired(&pool).await.unwrap();
        assert_eq!(swept, 1);

        assert!(RefreshTokenRepository::find_by_token(&pool, "expired-token")
            .await
            .unwrap()
            .is_none());
        assert!(RefreshTokenRepository::find_by_token(&pool, "live-token")
            .await
            .unwrap()
            .is_some());
    }
}
