//! 로그인 자격증명 검증.
//!
//! 식별자로 사용자를 조회하고 비밀번호를 검증하여 [`Principal`]을 반환합니다.
//! 응답 상으로는 미등록 식별자와 잘못된 비밀번호를 구분하지 않습니다.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::ExposeSecret;
use stock_core::{verify_password, Credentials, IdentifierKind, Principal, UnknownRole};
use tracing::{error, info, warn};

use crate::error::ApiErrorResponse;
use crate::repository::{CredentialStore, StoreError};

/// 미등록 식별자일 때 검증에 사용하는 고정 해시.
///
/// 실제 사용자 검증과 같은 Argon2 비용(m=19456, t=2, p=1)을 치르게 하여 응답 시간 차이를 줄입니다.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$hQeoHK21JzCxSgr7tn3fYQ$OA6DeQGYN+28vbcOPWZVy5YYPWsaiX30TjuqRfHqtoM";

/// 인증 실패 사유.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("등록되지 않은 식별자")]
    NotFound,
    #[error("비밀번호 불일치")]
    InvalidCredentials,
    #[error("자격증명 저장소 에러: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl AuthFailure {
    /// 클라이언트 자격증명 문제인지 (401) 서버 결함인지 (500) 구분합니다.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, AuthFailure::NotFound | AuthFailure::InvalidCredentials)
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        if self.is_credential_error() {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiErrorResponse::invalid_credentials()),
            )
                .into_response()
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::internal()),
            )
                .into_response()
        }
    }
}

/// 로그인 인증기.
///
/// 상태를 갖지 않으며 `Arc`로 공유됩니다. 재시도나 캐시는 하지 않습니다.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    identifier: IdentifierKind,
}

impl Authenticator {
    /// 저장소와 로그인 식별자 필드로 인증기를 생성합니다.
    pub fn new(store: Arc<dyn CredentialStore>, identifier: IdentifierKind) -> Self {
        Self { store, identifier }
    }

    /// 설정된 로그인 식별자 필드.
    pub fn identifier_kind(&self) -> IdentifierKind {
        self.identifier
    }

    /// 자격증명을 검증합니다.
    ///
    /// 1. 식별자 정규화 (공백 제거, 이메일은 소문자)
    /// 2. 설정된 필드 하나로만 조회
    /// 3. 블로킹 스레드에서 비밀번호 검증 (미등록 사용자는 더미 해시로 검증)
    /// 4. 일치하면 해시를 버린 [`Principal`] 반환
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Principal, AuthFailure> {
        let identifier = self.identifier.normalize(&credentials.identifier);

        let record = match self.identifier {
            IdentifierKind::Email => self.store.find_by_email(&identifier).await,
            IdentifierKind::Username => self.store.find_by_username(&identifier).await,
        }
        .map_err(|e| {
            error!(identifier = %identifier, error = %e, "Credential lookup failed");
            AuthFailure::Store(e)
        })?;

        let stored_hash = record
            .as_ref()
            .map(|r| r.password_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.to_string());
        let secret = credentials.secret;

        let matched =
            tokio::task::spawn_blocking(move || verify_password(secret.expose_secret(), &stored_hash))
                .await
                .map_err(|e| AuthFailure::Internal(e.to_string()))?;

        let Some(record) = record else {
            warn!(identifier = %identifier, "Login rejected: unknown identifier");
            return Err(AuthFailure::NotFound);
        };

        if !matched {
            warn!(identifier = %identifier, "Login rejected: secret mismatch");
            return Err(AuthFailure::InvalidCredentials);
        }

        let principal = record.into_principal().map_err(|e| {
            error!(identifier = %identifier, role = %e.0, "Stored role is not recognized");
            AuthFailure::UnknownRole(e)
        })?;

        info!(
            identifier = %identifier,
            user_id = %principal.id,
            role = %principal.role,
            "Login succeeded"
        );

        Ok(principal)
    }
}
