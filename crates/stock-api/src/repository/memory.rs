//! 메모리 기반 자격증명 저장소.
//!
//! 데이터베이스 없이 서버를 띄울 때(개발, 테스트) 사용합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use stock_core::{DevUser, PrincipalId, PrincipalRecord};
use tokio::sync::RwLock;

use super::users::{CredentialStore, StoreError};

/// 사용자 ID를 키로 하는 메모리 저장소.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<PrincipalId, PrincipalRecord>>,
}

impl InMemoryCredentialStore {
    /// 레코드 목록으로 저장소를 생성합니다.
    pub fn with_records(records: impl IntoIterator<Item = PrincipalRecord>) -> Self {
        let users = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// 설정의 `auth.dev_users`로 저장소를 생성합니다.
    pub fn from_dev_users(dev_users: &[DevUser]) -> Self {
        Self::with_records(dev_users.iter().map(|u| PrincipalRecord {
            id: PrincipalId(u.id),
            username: u.username.clone(),
            email: u.email.clone(),
            role_name: u.role.clone(),
            password_hash: u.password_hash.clone(),
        }))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<PrincipalRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PrincipalRecord>, StoreError> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, username: &str, email: &str) -> PrincipalRecord {
        PrincipalRecord {
            id: PrincipalId(id),
            username: username.to_string(),
            email: email.to_string(),
            role_name: "ops".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let store = InMemoryCredentialStore::with_records([record(1, "bob", "Bob@Example.com")]);

        let found = store.find_by_email("bob@example.com").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(PrincipalId(1)));
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_username_is_exact() {
        let store = InMemoryCredentialStore::with_records([record(2, "carol", "carol@example.com")]);

        assert!(store.find_by_username("carol").await.unwrap().is_some());
        assert!(store.find_by_username("Carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_later_record_replaces_same_id() {
        let store = InMemoryCredentialStore::with_records([
            record(3, "dave", "dave@example.com"),
            record(3, "david", "david@example.com"),
        ]);

        assert!(store.find_by_username("dave").await.unwrap().is_none());
        assert!(store.find_by_username("david").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_from_dev_users() {
        let dev_users: Vec<DevUser> = serde_json::from_value(serde_json::json!([{
            "id": 5,
            "username": "erin",
            "email": "erin@example.com",
            "role": "operasional",
            "password_hash": "$2b$04$placeholder"
        }]))
        .unwrap();
        let store = InMemoryCredentialStore::from_dev_users(&dev_users);

        let found = store.find_by_email("ERIN@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, PrincipalId(5));
        assert_eq!(found.role_name, "operasional");
    }
}
