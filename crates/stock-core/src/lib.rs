//! # Stock Core
//!
//! 재고 관리 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 서버와 클라이언트가 함께 사용하는 기본 타입을 제공합니다:
//! - 사용자(Principal) 및 역할(Role) 정의
//! - 토큰 클레임(Claims)
//! - 재고 이력 타입
//! - 비밀번호 해싱 및 검증
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use crypto::{hash_password, verify_password, CryptoError, HashScheme};
pub use domain::*;
pub use error::*;
pub use logging::*;
