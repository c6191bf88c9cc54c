//! 비밀번호 해시 생성 (사용자 시드용).

use anyhow::{Context, Result};
use stock_core::crypto::validate_password_strength;
use stock_core::hash_password;
use tracing::warn;

/// Argon2id PHC 문자열 생성.
///
/// 약한 비밀번호는 경고만 남기고 해시는 생성합니다.
pub fn hash(secret: &str) -> Result<String> {
    let secret = secret.trim_end_matches(['\r', '\n']);
    if let Err(reason) = validate_password_strength(secret) {
        warn!("{}", reason);
    }
    hash_password(secret).context("해시 생성 실패")
}
