//! 인증 및 재고 관리를 위한 도메인 모델.

mod claims;
mod credentials;
mod principal;
mod role;
mod stock;

pub use claims::*;
pub use credentials::*;
pub use principal::*;
pub use role::*;
pub use stock::*;
