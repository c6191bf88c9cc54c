//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 인증기와 토큰 발급기는 불변이므로 잠금 없이 사용합니다.

use std::sync::Arc;

use crate::auth::{Authenticator, TokenIssuer, TokenVerifierState};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 로그인 인증기 - 자격증명 저장소 + 비밀번호 검증
    pub authenticator: Arc<Authenticator>,
    /// 액세스 토큰 발급/검증
    pub tokens: Arc<TokenIssuer>,
    /// 데이터베이스 연결 풀 (없으면 메모리 저장소로 동작)
    pub db_pool: Option<sqlx::PgPool>,
    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(authenticator: Authenticator, tokens: TokenIssuer) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            tokens: Arc::new(tokens),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

impl TokenVerifierState for AppState {
    fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }
}

/// 테스트용 토큰 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 메모리 저장소로 동작하는 상태를 생성합니다.
/// 시드 사용자:
/// - `alice@example.com` / `correct` (admin)
/// - `bob@example.com` / `correct` (ops)
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;
    use stock_core::{hash_password, IdentifierKind, PrincipalId, PrincipalRecord};

    use crate::repository::InMemoryCredentialStore;

    let seed = |id: i64, username: &str, role: &str| PrincipalRecord {
        id: PrincipalId(id),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        role_name: role.to_string(),
        password_hash: hash_password("correct").expect("test hash"),
    };

    let store = InMemoryCredentialStore::with_records([seed(1, "alice", "admin"), seed(2, "bob", "ops")]);
    let authenticator = Authenticator::new(Arc::new(store), IdentifierKind::Email);
    let tokens = TokenIssuer::new(Some(&SecretString::from(TEST_JWT_SECRET)), 60)
        .expect("test secret is long enough");

    AppState::new(authenticator, tokens)
}
