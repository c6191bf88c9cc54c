//! 화면 라우트 가드.
//!
//! 보호된 화면으로 이동하기 전에 세션의 역할을 확인합니다.
//! 판단은 순수 함수이며 토큰 서명은 확인하지 않습니다.
//! 서버 리소스는 요청마다 토큰과 역할을 다시 검증합니다.

use std::fmt;

use stock_core::Role;

/// 로그인 화면 경로 (거부 시 이동 대상).
pub const LOGIN_ROUTE: &str = "/login";

/// 이동 한 건의 가드 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// 판단 전
    Pending,
    Allowed,
    /// 거부됨, `redirect`로 이동
    Denied { redirect: &'static str },
}

/// 역할 요구 조건 판단.
///
/// 현재 역할이 요구 역할과 정확히 같을 때만 허용합니다.
/// 역할 간 상하 관계는 없습니다.
pub fn decide(required: Role, current: Option<Role>) -> GuardState {
    match current {
        Some(role) if role == required => GuardState::Allowed,
        _ => GuardState::Denied {
            redirect: LOGIN_ROUTE,
        },
    }
}

/// 화면 접근 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    RequiresRole(Role),
}

/// 화면 라우트 정의.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub name: &'static str,
    pub access: Access,
}

/// 클라이언트 라우트 테이블.
pub const ROUTES: &[RouteDef] = &[
    RouteDef {
        path: "/",
        name: "home",
        access: Access::Public,
    },
    RouteDef {
        path: LOGIN_ROUTE,
        name: "login",
        access: Access::Public,
    },
    RouteDef {
        path: "/admin-dashboard",
        name: "admin-dashboard",
        access: Access::RequiresRole(Role::Admin),
    },
    RouteDef {
        path: "/ops-dashboard",
        name: "ops-dashboard",
        access: Access::RequiresRole(Role::Ops),
    },
];

/// 경로로 라우트 조회. 끝의 `/`는 무시합니다.
pub fn find_route(path: &str) -> Option<&'static RouteDef> {
    let trimmed = path.trim();
    let normalized = match trimmed.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    ROUTES.iter().find(|r| r.path == normalized)
}

/// 화면 이동 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 화면 표시
    Render(&'static RouteDef),
    /// 다른 경로로 이동
    Redirect(&'static str),
    /// 등록되지 않은 경로
    NotFound,
}

/// 화면 이동 한 건.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub path: String,
    pub state: GuardState,
}

impl Navigation {
    /// 이동 시작 (판단 전 상태).
    pub fn begin(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: GuardState::Pending,
        }
    }

    /// 현재 역할로 이동을 마무리합니다.
    ///
    /// 공개 화면과 등록되지 않은 경로는 가드를 거치지 않습니다.
    pub fn resolve(&mut self, current: Option<Role>) -> Outcome {
        let Some(route) = find_route(&self.path) else {
            return Outcome::NotFound;
        };

        match route.access {
            Access::Public => {
                self.state = GuardState::Allowed;
                Outcome::Render(route)
            }
            Access::RequiresRole(required) => {
                self.state = decide(required, current);
                match self.state {
                    GuardState::Denied { redirect } => Outcome::Redirect(redirect),
                    _ => Outcome::Render(route),
                }
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Render(route) => write!(f, "allowed: {} ({})", route.path, route.name),
            Outcome::Redirect(to) => write!(f, "denied → {}", to),
            Outcome::NotFound => write!(f, "not found"),
        }
    }
}
