//! 클라이언트 세션 저장소.
//!
//! 로그인 후 받은 액세스 토큰과 토큰에서 꺼낸 역할/만료 시각을 JSON 파일에 보관합니다.
//! 토큰을 해석할 수 없거나 만료되면 세션 파일을 지우고 로그아웃 상태로 취급합니다.
//!
//! 여기서 꺼낸 역할은 화면 이동 판단에만 쓰입니다.
//! 서명 검증은 서버가 요청마다 다시 수행합니다.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use stock_core::{Claims, Role};
use thiserror::Error;
use tracing::{debug, warn};

/// 기본 세션 파일 경로.
pub const DEFAULT_SESSION_FILE: &str = ".stock-session.json";

/// 세션 에러.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("세션 파일 입출력 실패: {0}")]
    Io(#[from] std::io::Error),

    #[error("세션 직렬화 실패: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("토큰을 해석할 수 없습니다: {0}")]
    UndecodableToken(#[from] jsonwebtoken::errors::Error),

    #[error("토큰에 만료 시각이 없습니다")]
    MissingExpiry,
}

/// 로그인 세션.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 액세스 토큰 원문
    pub token: String,
    pub username: String,
    /// 토큰에서 꺼낸 역할
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// 토큰 페이로드를 읽어 세션을 만듭니다.
    ///
    /// 서명 키가 없으므로 서명은 확인하지 않고, 만료도 여기서는 보지 않습니다.
    pub fn from_token(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        let claims = decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)?.claims;
        let expires_at = claims.expires_at().ok_or(SessionError::MissingExpiry)?;

        Ok(Self {
            token,
            username: claims.username,
            role: claims.role,
            expires_at,
        })
    }

    /// 주어진 시각 기준 만료 여부.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// 파일 기반 세션 저장소.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 유효한 세션을 읽습니다.
    ///
    /// 파일이 없으면 `None`. 파일이 손상됐거나, 저장된 역할이 토큰과 다르거나,
    /// 토큰이 만료됐으면 파일을 지우고 `None`을 반환합니다.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                self.clear()?;
                return Ok(None);
            }
        };

        let decoded = match Session::from_token(stored.token.as_str()) {
            Ok(decoded) if decoded == stored => decoded,
            Ok(_) => {
                warn!("Session file does not match its token, discarding");
                self.clear()?;
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Discarding session with undecodable token");
                self.clear()?;
                return Ok(None);
            }
        };

        if decoded.is_expired() {
            debug!(expired_at = %decoded.expires_at, "Session expired");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(decoded))
    }

    /// 세션 저장.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    /// 세션 삭제. 삭제한 파일이 있었으면 `true`.
    pub fn clear(&self) -> Result<bool, SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
