//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할 및 권한 정의.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 사용자마다 정확히 하나의 역할을 가집니다. 직렬화 시 소문자 이름을 사용하며,
/// 이전 시스템의 `operasional` 표기는 입력 시 `ops`로 받아들입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 관리자 - 모든 권한 보유
    Admin,
    /// 운영 담당자 - 재고 입출고 관리 권한
    #[serde(alias = "operasional")]
    Ops,
}

impl Role {
    /// 역할이 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewStockHistory => matches!(self, Role::Admin | Role::Ops),
        }
    }

    /// 문자열에서 역할 파싱.
    ///
    /// 대소문자와 앞뒤 공백은 무시합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "ops" | "operasional" => Some(Role::Ops),
            _ => None,
        }
    }

    /// 역할의 정규 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Ops => "ops",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 알 수 없는 역할 이름.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("알 수 없는 역할: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// 여러 역할이 공유하는 권한.
///
/// 역할 하나에만 열린 리소스는 권한 대신 역할로 검사합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// 재고 입출고 이력 조회
    ViewStockHistory,
}
