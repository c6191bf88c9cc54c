//! CLI 명령어 구현 모듈.
//!
//! 각 명령은 출력할 문자열을 반환하고, 출력은 `main`에서 처리합니다.

pub mod auth;
pub mod hash;
pub mod history;
pub mod navigate;
