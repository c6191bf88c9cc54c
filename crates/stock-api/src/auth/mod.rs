//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`Authenticator`]: 식별자 조회 + 비밀번호 검증 → [`stock_core::Principal`]
//! - [`TokenIssuer`]: Principal → 서명된 액세스 토큰, 토큰 검증
//! - [`JwtAuth`], [`AdminAuth`], [`StockViewerAuth`]: 보호 라우트용 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     JwtAuth(claims): JwtAuth,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.username)
//! }
//! ```

mod authenticator;
mod jwt;
mod middleware;

pub use authenticator::{AuthFailure, Authenticator};
pub use jwt::{IssuedToken, JwtError, TokenIssuer, MAX_TTL_MINUTES, MIN_SECRET_LEN};
pub use middleware::{
    require_permission, require_role, AdminAuth, JwtAuth, JwtAuthError, OpsAuth,
    StockViewerAuth, TokenVerifierState,
};
