//! # 비밀번호 해싱 모듈
//!
//! 사용자 비밀번호의 해싱 및 검증 기능을 제공합니다.
//!
//! ## 지원 형식
//! - **Argon2id** (PHC 문자열, `$argon2id$...`): 새로 생성되는 모든 해시
//! - **bcrypt** (`$2a$`, `$2b$`, `$2y$`): 이전 시스템에서 이관된 해시
//!
//! ## 보안 고려사항
//! - 해시 비교는 각 라이브러리의 상수 시간 비교에 위임
//! - 손상되었거나 지원하지 않는 해시는 에러 대신 불일치(`false`)로 처리
//! - 평문 비밀번호와 해시는 로그에 남기지 않음

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// 비밀번호 처리 에러.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("비밀번호 해싱 실패: {0}")]
    HashingFailed(String),

    #[error("빈 비밀번호는 해싱할 수 없습니다")]
    EmptySecret,
}

/// 저장된 해시의 알고리즘.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Argon2 계열 PHC 문자열
    Argon2,
    /// bcrypt (`$2a$`, `$2b$`, `$2y$`)
    Bcrypt,
}

impl HashScheme {
    /// 해시 문자열의 접두사로 알고리즘을 판별합니다.
    ///
    /// 알 수 없는 형식이면 `None`을 반환합니다.
    pub fn detect(stored_hash: &str) -> Option<Self> {
        if stored_hash.starts_with("$argon2") {
            Some(Self::Argon2)
        } else if ["$2a$", "$2b$", "$2y$"]
            .iter()
            .any(|prefix| stored_hash.starts_with(prefix))
        {
            Some(Self::Bcrypt)
        } else {
            None
        }
    }
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용하며 솔트는 자동으로 생성됩니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트 포함)
///
/// # Example
///
/// ```rust
/// use stock_core::crypto::{hash_password, verify_password};
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(verify_password("my_secure_password", &hash));
/// ```
pub fn hash_password(secret: &str) -> Result<String, CryptoError> {
    if secret.is_empty() {
        return Err(CryptoError::EmptySecret);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| CryptoError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 저장된 해시의 솔트와 비용 파라미터로 입력값을 다시 해싱하여 비교합니다.
/// 빈 비밀번호, 손상된 해시, 지원하지 않는 형식은 모두 `false`입니다.
pub fn verify_password(secret: &str, stored_hash: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    match HashScheme::detect(stored_hash) {
        Some(HashScheme::Argon2) => match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        },
        Some(HashScheme::Bcrypt) => bcrypt::verify(secret, stored_hash).unwrap_or(false),
        None => false,
    }
}

/// 비밀번호 강도 검증.
///
/// # 요구사항
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("비밀번호는 최소 8자 이상이어야 합니다");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("비밀번호에 최소 1개의 숫자가 포함되어야 합니다");
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("비밀번호에 최소 1개의 영문자가 포함되어야 합니다");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_argon2() {
        let hash = hash_password("correct").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(HashScheme::detect(&hash), Some(HashScheme::Argon2));
        assert!(verify_password("correct", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_legacy_bcrypt() {
        let hash = bcrypt::hash("correct", 4).unwrap();

        assert_eq!(HashScheme::detect(&hash), Some(HashScheme::Bcrypt));
        assert!(verify_password("correct", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_bcrypt_2a_prefix() {
        let hash = bcrypt::hash_with_result("correct", 4)
            .unwrap()
            .format_for_version(bcrypt::Version::TwoA);

        assert!(hash.starts_with("$2a$"));
        assert!(verify_password("correct", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);
        assert!(verify_password("Password1", &hash1));
        assert!(verify_password("Password1", &hash2));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("password", "not-a-valid-hash"));
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "$argon2id$garbage"));
        assert!(!verify_password("password", "$2b$04$tooshort"));
        assert!(!verify_password("password", "$md5$abc"));
    }

    #[test]
    fn test_empty_secret() {
        let hash = hash_password("correct").unwrap();
        assert!(!verify_password("", &hash));
        assert!(matches!(hash_password(""), Err(CryptoError::EmptySecret)));
    }

    #[test]
    fn test_unicode_password() {
        let password = "한글패스워드123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn test_password_strength_validation() {
        assert!(validate_password_strength("Password1").is_ok());
        assert!(validate_password_strength("abcd1234").is_ok());

        assert!(validate_password_strength("Pass1").is_err());
        assert!(validate_password_strength("Password").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("").is_err());
    }
}
