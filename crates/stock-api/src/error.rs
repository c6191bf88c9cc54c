//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// API 에러 코드.
pub mod codes {
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const DB_NOT_CONFIGURED: &str = "DB_NOT_CONFIGURED";
    pub const MISSING_TOKEN: &str = "MISSING_TOKEN";
    pub const INVALID_AUTH_HEADER: &str = "INVALID_AUTH_HEADER";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const INSUFFICIENT_PERMISSION: &str = "INSUFFICIENT_PERMISSION";
}

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "identifier: 식별자를 입력하세요",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_CREDENTIALS", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// # Example
    ///
    /// ```
    /// use stock_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("DB_NOT_CONFIGURED", "Database not configured");
    /// assert!(error.timestamp.is_some());
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    ///
    /// 응답 본문이 요청 시각과 무관하게 항상 같은 바이트가 되어야 할 때 사용합니다.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: None,
        }
    }

    /// 로그인 실패 응답 본문.
    ///
    /// 미등록 식별자와 잘못된 비밀번호 모두 이 값을 사용합니다.
    pub fn invalid_credentials() -> Self {
        Self::simple(codes::INVALID_CREDENTIALS, "Invalid credentials")
    }

    /// 세부 정보를 숨긴 서버 에러 본문.
    pub fn internal() -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal server error")
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// validator 에러를 400 응답으로 변환합니다.
///
/// `details`에는 필드별 메시지 목록이 들어갑니다.
pub fn validation_error(errors: validator::ValidationErrors) -> (StatusCode, Json<ApiErrorResponse>) {
    let mut fields = serde_json::Map::new();
    let mut summary = Vec::new();

    for (field, errs) in errors.field_errors() {
        let messages: Vec<String> = errs
            .iter()
            .map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => e.code.to_string(),
            })
            .collect();
        summary.extend(messages.iter().map(|m| format!("{}: {}", field, m)));
        fields.insert(field.to_string(), Value::from(messages));
    }
    summary.sort();

    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            codes::VALIDATION_ERROR,
            summary.join(", "),
            Value::Object(fields),
        )),
    )
}

/// 요청 본문 JSON 파싱 실패를 에러 응답으로 변환합니다.
///
/// 상태 코드는 axum의 판단(400, 415, 422)을 따릅니다.
pub fn json_rejection(rejection: JsonRejection) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        rejection.status(),
        Json(ApiErrorResponse::new(
            codes::VALIDATION_ERROR,
            rejection.body_text(),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_has_no_timestamp() {
        let a = serde_json::to_string(&ApiErrorResponse::invalid_credentials()).unwrap();
        let b = serde_json::to_string(&ApiErrorResponse::invalid_credentials()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, r#"{"code":"INVALID_CREDENTIALS","message":"Invalid credentials"}"#);
    }

    #[test]
    fn test_new_has_timestamp() {
        let error = ApiErrorResponse::new("DB_NOT_CONFIGURED", "Database not configured");
        assert_eq!(error.code, "DB_NOT_CONFIGURED");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_validation_error_details() {
        let mut errors = validator::ValidationErrors::new();
        errors.add(
            "identifier",
            validator::ValidationError::new("required").with_message("식별자를 입력하세요".into()),
        );

        let (status, Json(body)) = validation_error(errors);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, codes::VALIDATION_ERROR);
        assert_eq!(body.message, "identifier: 식별자를 입력하세요");

        let details = body.details.unwrap();
        assert_eq!(details["identifier"][0], "식별자를 입력하세요");
    }

    #[test]
    fn test_display() {
        let error = ApiErrorResponse::simple("TEST", "message");
        assert_eq!(error.to_string(), "[TEST] message");
    }
}
