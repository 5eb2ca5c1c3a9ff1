//! 인증 기본 요소.
//!
//! # 구성 요소
//!
//! - [`AccessClaims`]: JWT Access Token 페이로드
//! - [`generate_refresh_token`]: 불투명 Refresh Token 값 생성
//! - [`hash_password`] / [`verify_password`]: Argon2 비밀번호 해싱
//! - [`AuthUser`]: 보호된 라우트용 인증 추출기
//!
//! Refresh Token의 수명 주기(저장/회전/만료)는 [`crate::repository`]와
//! [`crate::routes::auth`]가 담당합니다.

mod jwt;
mod middleware;
mod password;
mod token;

pub use jwt::{create_access_token, decode_access_token, AccessClaims, JwtError};
pub use middleware::{AuthError, AuthUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::generate_refresh_token;
