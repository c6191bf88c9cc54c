//! 액세스 토큰 페이로드.
//!
//! 서버는 서명해서 발급하고, 클라이언트는 역할과 만료 시간을 읽어
//! 화면 접근 여부를 판단합니다.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::principal::{Principal, PrincipalId};
use super::role::{Permission, Role};

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 사용자 이름
    pub username: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `username` - 사용자 이름
    /// * `role` - 사용자 역할
    /// * `expires_in_minutes` - 만료 시간 (분), 표현 범위를 넘으면 경계 시각으로 고정
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        expires_in_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            username: username.into(),
            role,
            iat: now.timestamp(),
            exp: Duration::try_minutes(expires_in_minutes)
                .and_then(|ttl| now.checked_add_signed(ttl))
                .unwrap_or(if expires_in_minutes < 0 {
                    DateTime::<Utc>::MIN_UTC
                } else {
                    DateTime::<Utc>::MAX_UTC
                })
                .timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// 인증된 사용자로부터 Claims 생성.
    pub fn for_principal(principal: &Principal, expires_in_minutes: i64) -> Self {
        Self::new(
            principal.id.to_string(),
            principal.username.clone(),
            principal.role,
            expires_in_minutes,
        )
    }

    /// `sub`를 사용자 ID로 해석합니다.
    pub fn principal_id(&self) -> Option<PrincipalId> {
        self.sub.parse().ok()
    }

    /// 만료 시각.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// 주어진 시각 기준 만료 여부. `exp` 시각부터 만료입니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// 정확히 해당 역할인지 확인.
    ///
    /// 역할 간 상하 관계는 없습니다. 관리자도 운영 화면 역할과는 일치하지 않습니다.
    pub fn has_role(&self, required_role: Role) -> bool {
        self.role == required_role
    }
}
