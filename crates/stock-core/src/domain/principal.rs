//! 인증된 사용자(Principal)와 저장소 레코드.
//!
//! [`Principal`]은 외부로 노출되는 사용자 정보로, 비밀번호 해시 필드가 아예 없습니다.
//! 해시를 가진 유일한 타입은 [`PrincipalRecord`]이며, 인증이 끝나면
//! [`PrincipalRecord::into_principal`]로 소비되어 해시가 버려집니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::role::{Role, UnknownRole};

/// 사용자 식별자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct PrincipalId(pub i64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(PrincipalId)
    }
}

impl From<i64> for PrincipalId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// 인증된 사용자.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Principal {
    /// 사용자 ID
    pub id: PrincipalId,
    /// 사용자명
    pub username: String,
    /// 이메일
    pub email: String,
    /// 역할
    pub role: Role,
}

/// 자격증명 저장소가 반환하는 사용자 레코드.
///
/// 역할은 저장된 이름 그대로 보관하며, 알 수 없는 역할 이름은
/// [`into_principal`](Self::into_principal) 시점에 에러가 됩니다.
#[derive(Clone)]
pub struct PrincipalRecord {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    pub role_name: String,
    pub password_hash: String,
}

impl PrincipalRecord {
    /// 해시를 버리고 [`Principal`]로 변환합니다.
    pub fn into_principal(self) -> Result<Principal, UnknownRole> {
        let role = self.role_name.parse::<Role>()?;
        Ok(Principal {
            id: self.id,
            username: self.username,
            email: self.email,
            role,
        })
    }
}

impl fmt::Debug for PrincipalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role_name", &self.role_name)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role_name: &str) -> PrincipalRecord {
        PrincipalRecord {
            id: PrincipalId(1),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role_name: role_name.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[test]
    fn test_into_principal_drops_hash() {
        let principal = record("admin").into_principal().unwrap();
        assert_eq!(principal.id, PrincipalId(1));
        assert_eq!(principal.role, Role::Admin);

        let json = serde_json::to_value(&principal).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        assert!(keys.iter().all(|k| !k.contains("password") && !k.contains("hash")));
    }

    #[test]
    fn test_legacy_role_name() {
        let principal = record("operasional").into_principal().unwrap();
        assert_eq!(principal.role, Role::Ops);
    }

    #[test]
    fn test_unknown_role() {
        let err = record("superuser").into_principal().unwrap_err();
        assert_eq!(err.0, "superuser");
    }

    #[test]
    fn test_record_debug_redacts_hash() {
        let debug = format!("{:?}", record("admin"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn test_principal_id_roundtrip() {
        let id: PrincipalId = "42".parse().unwrap();
        assert_eq!(id, PrincipalId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<PrincipalId>().is_err());
    }
}
