//! Refresh Token 값 생성.
//!
//! Refresh Token은 구조가 없는 불투명 난수 문자열입니다.
//! 유효성은 디코딩이 아니라 저장소 조회([`crate::repository::RefreshTokenRepository`])로만
//! 결정되므로, 이 값의 유일한 보안 속성은 추측 불가능성입니다.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// 토큰 엔트로피 크기 (32바이트 = 256비트)
const REFRESH_TOKEN_BYTES: usize = 32;

/// 암호학적으로 안전한 Refresh Token 값 생성.
///
/// OS 제공 엔트로피를 사용하며, URL-safe base64 (패딩 없음)로 인코딩합니다.
pub fn generate_refresh_token() -> String {
    let mut buffer = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
