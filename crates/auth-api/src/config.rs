//! 서버 및 인증 설정.
//!
//! 모든 설정은 시작 시 환경 변수에서 1회 로드됩니다.
//! 서명 비밀 키는 전역 변수가 아니라 [`AuthConfig`]로 구성되어
//! 토큰 발급/검증 코드에 명시적으로 주입됩니다.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// 기본 Access Token 만료 시간 (분)
const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;

/// 기본 Refresh Token 만료 시간 (일)
const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;

/// 기본 만료 토큰 정리 주기 (초)
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// 서버 설정 구조체.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩할 호스트 주소
    pub host: String,
    /// 바인딩할 포트
    pub port: u16,
    /// 데이터베이스 연결 문자열
    pub database_url: String,
    /// 만료 Refresh Token 정리 주기
    pub sweep_interval: Duration,
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    ///
    /// - `API_HOST`: 바인딩 주소 (기본값: "0.0.0.0")
    /// - `PORT`: 바인딩 포트 (기본값: 8080)
    /// - `DATABASE_URL`: PostgreSQL 연결 문자열 (필수)
    /// - `TOKEN_SWEEP_INTERVAL_SECS`: 만료 토큰 정리 주기 (기본값: 3600)
    ///
    /// # Errors
    ///
    /// `DATABASE_URL`이 없으면 에러를 반환합니다.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let sweep_interval = std::env::var("TOKEN_SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));

        Ok(Self {
            host,
            port,
            database_url,
            sweep_interval,
        })
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    ///
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 토큰 발급/검증 설정.
///
/// 프로세스 전역에서 읽기 전용으로 공유되며, 요청 처리 중에는
/// 절대 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// Access Token 만료 시간 (분)
    pub access_ttl_minutes: i64,
    /// Refresh Token 만료 시간 (일)
    pub refresh_ttl_days: i64,
}

impl AuthConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    ///
    /// - `JWT_SECRET`: 서명 비밀 키 (필수)
    /// - `ACCESS_TOKEN_TTL_MINUTES`: Access Token 만료 (기본값: 15)
    /// - `REFRESH_TOKEN_TTL_DAYS`: Refresh Token 만료 (기본값: 30)
    ///
    /// # Errors
    ///
    /// `JWT_SECRET`이 없으면 에러를 반환합니다. 비밀 키 부재는
    /// 요청 단위가 아니라 시작 시점의 치명적 오류입니다.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let access_ttl_minutes = std::env::var("ACCESS_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TTL_MINUTES);
        let refresh_ttl_days = std::env::var("REFRESH_TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TTL_DAYS);

        Ok(Self {
            jwt_secret,
            access_ttl_minutes,
            refresh_ttl_days,
        })
    }
}
