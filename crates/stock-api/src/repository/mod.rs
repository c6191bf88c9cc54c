//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 자격증명 조회는 [`CredentialStore`] trait 뒤에 두어 PostgreSQL과 메모리 구현을
//! 교체할 수 있고, 나머지 Repository는 static methods 패턴을 사용합니다.

pub mod memory;
pub mod stock_history;
pub mod users;

pub use memory::InMemoryCredentialStore;
pub use stock_history::StockHistoryRepository;
pub use users::{CredentialStore, PgCredentialStore, StoreError};
