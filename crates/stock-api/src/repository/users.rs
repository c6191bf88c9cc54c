//! 사용자 자격증명 Repository
//!
//! 로그인 식별자로 사용자 레코드(해시와 역할 이름 포함)를 조회합니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use stock_core::{PrincipalId, PrincipalRecord};

// ================================================================================================
// Types
// ================================================================================================

/// 자격증명 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
}

/// 사용자 조회 경계.
///
/// 한 번의 로그인에는 설정된 식별자에 맞는 메서드 하나만 호출됩니다.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 사용자명으로 조회 (대소문자 구분).
    async fn find_by_username(&self, username: &str)
        -> Result<Option<PrincipalRecord>, StoreError>;

    /// 이메일로 조회 (대소문자 무시).
    async fn find_by_email(&self, email: &str) -> Result<Option<PrincipalRecord>, StoreError>;
}

/// users + roles 조인 결과
#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    role_name: String,
    password_hash: String,
}

impl From<UserRow> for PrincipalRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: PrincipalId(row.id),
            username: row.username,
            email: row.email,
            role_name: row.role_name,
            password_hash: row.password_hash,
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// PostgreSQL 기반 자격증명 저장소
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<PrincipalRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id::BIGINT AS id, u.username, u.email,
                r.name AS role_name, u.password_hash
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PrincipalRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PrincipalRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id::BIGINT AS id, u.username, u.email,
                r.name AS role_name, u.password_hash
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE lower(u.email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PrincipalRecord::from))
    }
}
