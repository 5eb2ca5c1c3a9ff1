//! 만료 Refresh Token 정리 태스크.
//!
//! 지연 삭제(재발급 시점 정리)만으로는 다시 제시되지 않는 만료 행이
//! 테이블에 누적되므로, 주기적으로 일괄 삭제합니다.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::metrics::record_swept_tokens;
use crate::repository::RefreshTokenRepository;

/// 만료 토큰 정리 루프 시작.
///
/// 주어진 주기마다 만료된 refresh_tokens 행을 일괄 삭제합니다.
/// `shutdown` 토큰이 취소되면 루프를 종료합니다.
pub fn start_expired_token_sweeper(
    pool: PgPool,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // 첫 tick은 즉시 발생하므로 소비하고 시작
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Expired token sweeper started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Expired token sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match RefreshTokenRepository::delete_expired(&pool).await {
                        Ok(0) => {
                            debug!("No expired refresh tokens to sweep");
                        }
                        Ok(count) => {
                            record_swept_tokens(count);
                            info!(count, "Swept expired refresh tokens");
                        }
                        Err(e) => {
                            // 다음 주기에 재시도
                            error!(error = %e, "Failed to sweep expired refresh tokens");
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_on_cancellation() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool creation should not touch the network");
        let shutdown = CancellationToken::new();

        let handle =
            start_expired_token_sweeper(pool, Duration::from_secs(3600), shutdown.clone());

        shutdown.cancel();
        handle.await.expect("sweeper task should exit cleanly");
    }
}
