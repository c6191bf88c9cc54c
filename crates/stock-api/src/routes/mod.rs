//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 로그인, 현재 사용자
//! - `/api/v1/stock` - 재고 입출고 이력

pub mod auth;
pub mod health;
pub mod stock;

pub use auth::{auth_router, LoginRequest, LoginResponse, MeResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use stock::{stock_router, HistoryQuery};

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/stock", stock_router())
}
