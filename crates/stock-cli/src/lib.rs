//! 재고 관리 CLI 클라이언트.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 로그인 및 세션 파일 관리
//! - 역할 기반 화면 라우트 가드
//! - 재고 이력 API 호출
//! - 사용자 시드용 비밀번호 해시 생성

pub mod client;
pub mod commands;
pub mod guard;
pub mod session;

pub use client::{ApiClient, ClientError, HistoryFilter, DEFAULT_API_URL};
pub use guard::{decide, GuardState, Navigation, Outcome, LOGIN_ROUTE, ROUTES};
pub use session::{Session, SessionError, SessionStore, DEFAULT_SESSION_FILE};
