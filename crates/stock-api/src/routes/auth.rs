//! 인증 endpoint.
//!
//! 로그인 성공 시 역할 클레임이 담긴 액세스 토큰을 발급합니다.
//! 실패 응답은 미등록 식별자와 잘못된 비밀번호를 구분하지 않습니다.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use stock_core::{Credentials, PrincipalId, Role};
use tracing::error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::JwtAuth;
use crate::error::{json_rejection, validation_error, ApiErrorResponse};
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 로그인 요청.
///
/// 이전 클라이언트 호환을 위해 `email`/`username`, `password` 필드명도 받습니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// 로그인 식별자 (설정에 따라 이메일 또는 사용자명)
    #[serde(default, alias = "email", alias = "username")]
    #[validate(custom(function = "validate_not_blank"))]
    pub identifier: String,

    /// 비밀번호
    #[serde(default = "empty_secret", alias = "password")]
    #[validate(custom(function = "validate_secret_present"))]
    #[schema(value_type = String, format = Password)]
    pub secret: SecretString,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("식별자를 입력하세요".into()));
    }
    Ok(())
}

fn validate_secret_present(value: &SecretString) -> Result<(), ValidationError> {
    if value.expose_secret().is_empty() {
        return Err(ValidationError::new("required").with_message("비밀번호를 입력하세요".into()));
    }
    Ok(())
}

impl LoginRequest {
    fn into_credentials(self) -> Credentials {
        Credentials {
            identifier: self.identifier,
            secret: self.secret,
        }
    }
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// 서명된 액세스 토큰 (JWT)
    pub access_token: String,
}

/// 현재 사용자 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub id: PrincipalId,
    pub username: String,
    pub role: Role,
    /// 토큰 만료 시각
    pub expires_at: Option<DateTime<Utc>>,
}

// ==================== 핸들러 ====================

/// 로그인.
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "필수 입력 누락 또는 잘못된 JSON", body = ApiErrorResponse),
        (status = 401, description = "자격증명 불일치", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_rejection(rejection).into_response(),
    };

    if let Err(errors) = request.validate() {
        return validation_error(errors).into_response();
    }

    let principal = match state
        .authenticator
        .authenticate(request.into_credentials())
        .await
    {
        Ok(principal) => principal,
        Err(failure) => return failure.into_response(),
    };

    match state.tokens.issue(&principal) {
        Ok(issued) => (
            StatusCode::OK,
            Json(LoginResponse {
                access_token: issued.token,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(user_id = %principal.id, error = %e, "Token signing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::internal()),
            )
                .into_response()
        }
    }
}

/// 현재 토큰의 사용자 정보.
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "검증된 토큰 정보", body = MeResponse),
        (status = 401, description = "토큰 누락 또는 무효", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(JwtAuth(claims): JwtAuth) -> Result<Json<MeResponse>, Response> {
    let id = claims.principal_id().ok_or_else(|| {
        error!(sub = %claims.sub, "Verified token carries a non-numeric subject");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse::internal()),
        )
            .into_response()
    })?;

    Ok(Json(MeResponse {
        id,
        username: claims.username.clone(),
        role: claims.role,
        expires_at: claims.expires_at(),
    }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}
