//! 로그인 자격증명.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 로그인 식별자로 사용할 필드.
///
/// 배포마다 하나만 사용합니다. 두 필드를 모두 조회하지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// 이메일 (대소문자 무시)
    #[default]
    Email,
    /// 사용자명 (대소문자 구분)
    Username,
}

impl IdentifierKind {
    /// 식별자를 정규화합니다.
    ///
    /// 앞뒤 공백을 제거하고, 이메일이면 소문자로 변환합니다.
    pub fn normalize(&self, identifier: &str) -> String {
        let trimmed = identifier.trim();
        match self {
            IdentifierKind::Email => trimmed.to_lowercase(),
            IdentifierKind::Username => trimmed.to_string(),
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Email => f.write_str("email"),
            IdentifierKind::Username => f.write_str("username"),
        }
    }
}

/// 로그인 요청 한 건의 자격증명.
///
/// 저장하거나 로그에 남기지 않습니다.
pub struct Credentials {
    pub identifier: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
