//! 로그인, 로그아웃, 현재 세션 조회.

use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::info;

use crate::client::{ApiClient, ClientError};
use crate::session::{Session, SessionStore};

/// 로그인 후 세션 저장.
///
/// 실패하면 기존 세션은 건드리지 않습니다.
pub async fn login(
    client: &ApiClient,
    store: &SessionStore,
    identifier: &str,
    secret: &SecretString,
) -> Result<String> {
    let token = match client.login(identifier, secret).await {
        Ok(token) => token,
        Err(ClientError::InvalidCredentials) => {
            anyhow::bail!("로그인 실패: 아이디 또는 비밀번호가 올바르지 않습니다")
        }
        Err(e) => return Err(e).context("로그인 요청 실패"),
    };

    let session = Session::from_token(token).context("서버가 해석할 수 없는 토큰을 반환했습니다")?;
    store
        .save(&session)
        .with_context(|| format!("세션 저장 실패: {}", store.path().display()))?;

    info!(username = %session.username, role = %session.role, "Logged in");

    Ok(format!(
        "로그인 성공: {} ({}), 만료 {}",
        session.username,
        session.role,
        session.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    ))
}

const NOT_LOGGED_IN: &str = "로그인 상태가 아닙니다";

/// 세션 삭제.
pub fn logout(store: &SessionStore) -> Result<String> {
    if store.clear()? {
        Ok("로그아웃 되었습니다".to_string())
    } else {
        Ok(NOT_LOGGED_IN.to_string())
    }
}

/// 현재 세션 정보.
pub fn whoami(store: &SessionStore) -> Result<String> {
    Ok(match store.load()? {
        Some(session) => format!(
            "{} ({}), 만료 {}",
            session.username,
            session.role,
            session.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => NOT_LOGGED_IN.to_string(),
    })
}
