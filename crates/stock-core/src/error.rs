//! 재고 관리 서비스의 에러 타입.
//!
//! 서버와 CLI가 공유하는 설정 단계 에러를 정의합니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Error)]
pub enum StockError {
    /// 설정 소스를 읽거나 역직렬화하지 못함
    #[error("설정 에러: {0}")]
    Config(String),

    /// 값은 읽었지만 사용할 수 없음
    #[error("잘못된 설정 {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// 서비스 작업을 위한 Result 타입.
pub type StockResult<T> = Result<T, StockError>;

impl StockError {
    pub fn invalid_setting(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StockError::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for StockError {
    fn from(err: config::ConfigError) -> Self {
        StockError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_config() {
        let err: StockError = config::ConfigError::NotFound("server.port".to_string()).into();
        assert!(matches!(err, StockError::Config(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_invalid_setting_message() {
        let err = StockError::invalid_setting("auth.dev_users[0].role", "알 수 없는 역할");
        assert_eq!(
            err.to_string(),
            "잘못된 설정 auth.dev_users[0].role: 알 수 없는 역할"
        );
    }
}
