//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `STOCK__` 접두사 환경 변수 순서로 병합합니다.
//! 예: `STOCK__AUTH__JWT_SECRET`, `STOCK__SERVER__PORT`, `STOCK__CORS__ORIGINS=a,b`.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

use crate::crypto::HashScheme;
use crate::domain::{IdentifierKind, Role};
use crate::error::{StockError, StockResult};

/// 설정 파일 경로를 지정하는 환경 변수.
pub const CONFIG_PATH_ENV: &str = "STOCK_CONFIG";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// CORS 설정
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 연결 URL. 없으면 메모리 저장소로 동작합니다.
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 5,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 토큰 서명 키 (최소 32바이트)
    pub jwt_secret: Option<SecretString>,
    /// 액세스 토큰 유효 시간 (분)
    pub token_ttl_minutes: i64,
    /// 로그인 식별자 필드
    pub login_identifier: IdentifierKind,
    /// 데이터베이스 없이 실행할 때 메모리 저장소에 넣을 사용자
    pub dev_users: Vec<DevUser>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_minutes: 60,
            login_identifier: IdentifierKind::Email,
            dev_users: Vec::new(),
        }
    }
}

/// 개발용 사용자 시드.
///
/// 비밀번호는 해시로만 받습니다 (`stock hash-password`로 생성).
#[derive(Clone, Deserialize)]
pub struct DevUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

impl std::fmt::Debug for DevUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "stock_api=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 허용할 Origin 목록. 비어 있으면 모든 Origin 허용 (개발용).
    pub origins: Vec<String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    /// 읽은 값은 [`AppConfig::validate`]로 검사합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> StockResult<Self> {
        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("STOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `STOCK_CONFIG` 또는 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> StockResult<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }
}

impl AppConfig {
    /// 서버를 띄우기 전에 잡을 수 있는 설정 오류 검사.
    ///
    /// 서명 키와 토큰 유효 시간은 토큰 발급기가 검사합니다.
    pub fn validate(&self) -> StockResult<()> {
        if self.server.request_timeout_secs == 0 {
            return Err(StockError::invalid_setting(
                "server.request_timeout_secs",
                "0보다 커야 합니다",
            ));
        }

        let mut ids = std::collections::HashSet::new();
        for (i, user) in self.auth.dev_users.iter().enumerate() {
            if !ids.insert(user.id) {
                return Err(StockError::invalid_setting(
                    format!("auth.dev_users[{}].id", i),
                    format!("중복된 ID {}", user.id),
                ));
            }
            if Role::parse(&user.role).is_none() {
                return Err(StockError::invalid_setting(
                    format!("auth.dev_users[{}].role", i),
                    format!("알 수 없는 역할 '{}'", user.role),
                ));
            }
            if HashScheme::detect(&user.password_hash).is_none() {
                return Err(StockError::invalid_setting(
                    format!("auth.dev_users[{}].password_hash", i),
                    "Argon2id 또는 bcrypt 해시가 아닙니다",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();

        assert_eq!(config.server.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert_eq!(config.auth.login_identifier, IdentifierKind::Email);
        assert!(config.database.url.is_none());
        assert!(config.cors.origins.is_empty());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[auth]
jwt_secret = "0123456789abcdef0123456789abcdef"
token_ttl_minutes = 15
login_identifier = "username"

[[auth.dev_users]]
id = 1
username = "alice"
email = "alice@example.com"
role = "admin"
password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert_eq!(config.auth.login_identifier, IdentifierKind::Username);
        assert_eq!(
            config.auth.jwt_secret.as_ref().unwrap().expose_secret(),
            "0123456789abcdef0123456789abcdef"
        );
        assert_eq!(config.auth.dev_users.len(), 1);

        let debug = format!("{:?}", config.auth);
        assert!(!debug.contains("0123456789abcdef"));
        assert!(!debug.contains("argon2id"));
    }

    fn dev_user(id: i64, role: &str, password_hash: &str) -> DevUser {
        DevUser {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            role: role.to_string(),
            password_hash: password_hash.to_string(),
        }
    }

    #[test]
    fn test_validate_dev_users() {
        let argon = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";
        let mut config = AppConfig::default();
        config.auth.dev_users = vec![dev_user(1, "admin", argon), dev_user(2, "operasional", argon)];
        assert!(config.validate().is_ok());

        config.auth.dev_users.push(dev_user(3, "superuser", argon));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, StockError::InvalidSetting { ref key, .. } if key == "auth.dev_users[2].role"));

        config.auth.dev_users = vec![dev_user(1, "ops", "plaintext")];
        assert!(matches!(
            config.validate(),
            Err(StockError::InvalidSetting { ref key, .. }) if key == "auth.dev_users[0].password_hash"
        ));

        config.auth.dev_users = vec![dev_user(1, "ops", argon), dev_user(1, "admin", argon)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_dev_user() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[auth.dev_users]]
id = 1
username = "eve"
email = "eve@example.com"
role = "root"
password_hash = "$2b$04$abcdefghijklmnopqrstuu5Jb6cB8S0nOfUzVdGy7v1Jq3k9p4Ju"
"#
        )
        .unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(StockError::InvalidSetting { .. })
        ));
    }
}
