//! 재고 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - 자격증명 검증과 JWT 액세스 토큰 발급
//! - 역할 기반 라우트 보호
//! - 재고 입출고 이력 조회
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 인증기, 토큰 발급기, 역할 extractor
//! - [`repository`]: 자격증명 저장소 및 재고 이력 조회
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    AdminAuth, AuthFailure, Authenticator, JwtAuth, JwtAuthError, OpsAuth, StockViewerAuth,
    TokenIssuer,
};
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
