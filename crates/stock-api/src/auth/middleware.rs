//! Axum용 JWT 인증 추출기.
//!
//! 클라이언트의 라우트 가드는 화면 이동만 막을 뿐이므로, 서버의 모든 보호 리소스는
//! 여기의 추출기로 토큰과 역할을 다시 검증합니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use stock_core::{Claims, Permission, Role};

use super::jwt::{JwtError, TokenIssuer};
use crate::error::{codes, ApiErrorResponse};

/// 토큰 검증기를 제공하는 라우터 상태.
pub trait TokenVerifierState {
    fn token_issuer(&self) -> &TokenIssuer;
}

impl<T: TokenVerifierState> TokenVerifierState for Arc<T> {
    fn token_issuer(&self) -> &TokenIssuer {
        T::token_issuer(self)
    }
}

/// JWT 인증 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(claims): JwtAuth,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("권한이 부족합니다")]
    InsufficientPermission,
}

impl JwtAuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            JwtAuthError::MissingToken => (StatusCode::UNAUTHORIZED, codes::MISSING_TOKEN),
            JwtAuthError::InvalidAuthHeader => {
                (StatusCode::UNAUTHORIZED, codes::INVALID_AUTH_HEADER)
            }
            JwtAuthError::TokenExpired => (StatusCode::UNAUTHORIZED, codes::TOKEN_EXPIRED),
            JwtAuthError::InvalidToken => (StatusCode::UNAUTHORIZED, codes::INVALID_TOKEN),
            JwtAuthError::InsufficientPermission => {
                (StatusCode::FORBIDDEN, codes::INSUFFICIENT_PERMISSION)
            }
        }
    }
}

impl From<JwtError> for JwtAuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => JwtAuthError::TokenExpired,
            _ => JwtAuthError::InvalidToken,
        }
    }
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(ApiErrorResponse::simple(code, self.to_string()));
        (status, body).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    S: TokenVerifierState + Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(JwtAuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(JwtAuthError::InvalidAuthHeader)?;

        let claims = state.token_issuer().verify(token)?;

        Ok(JwtAuth(claims))
    }
}

/// 정확히 해당 역할인지 검사합니다.
pub fn require_role(required_role: Role, claims: &Claims) -> Result<(), JwtAuthError> {
    if claims.has_role(required_role) {
        Ok(())
    } else {
        Err(JwtAuthError::InsufficientPermission)
    }
}

/// 역할이 해당 권한을 가지는지 검사합니다.
pub fn require_permission(permission: Permission, claims: &Claims) -> Result<(), JwtAuthError> {
    if claims.has_permission(permission) {
        Ok(())
    } else {
        Err(JwtAuthError::InsufficientPermission)
    }
}

/// Admin 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: TokenVerifierState + Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_role(Role::Admin, &claims)?;
        Ok(AdminAuth(claims))
    }
}

/// Ops 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct OpsAuth(pub Claims);

impl<S> FromRequestParts<S> for OpsAuth
where
    S: TokenVerifierState + Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_role(Role::Ops, &claims)?;
        Ok(OpsAuth(claims))
    }
}

/// 재고 이력 조회 권한(admin, ops)을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct StockViewerAuth(pub Claims);

impl<S> FromRequestParts<S> for StockViewerAuth
where
    S: TokenVerifierState + Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_permission(Permission::ViewStockHistory, &claims)?;
        Ok(StockViewerAuth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use secrecy::SecretString;

    const TEST_SECRET: &str = "middleware-test-secret-at-least-32-bytes";

    struct TestState(TokenIssuer);

    impl TokenVerifierState for TestState {
        fn token_issuer(&self) -> &TokenIssuer {
            &self.0
        }
    }

    fn state() -> TestState {
        TestState(TokenIssuer::new(Some(&SecretString::from(TEST_SECRET)), 60).unwrap())
    }

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn token_for(state: &TestState, role: Role) -> String {
        let principal = stock_core::Principal {
            id: stock_core::PrincipalId(5),
            username: "tester".to_string(),
            email: "tester@example.com".to_string(),
            role,
        };
        state.0.issue(&principal).unwrap().token
    }

    #[test]
    fn test_require_role_is_exact() {
        let admin = Claims::new("1", "admin", Role::Admin, 60);
        let ops = Claims::new("2", "ops", Role::Ops, 60);

        assert!(require_role(Role::Admin, &admin).is_ok());
        assert!(require_role(Role::Ops, &admin).is_err());
        assert!(require_role(Role::Ops, &ops).is_ok());
        assert!(require_role(Role::Admin, &ops).is_err());
    }

    #[test]
    fn test_require_permission() {
        let admin = Claims::new("1", "admin", Role::Admin, 60);
        let ops = Claims::new("2", "ops", Role::Ops, 60);
        assert!(require_permission(Permission::ViewStockHistory, &admin).is_ok());
        assert!(require_permission(Permission::ViewStockHistory, &ops).is_ok());
    }

    #[test]
    fn test_jwt_auth_error_responses() {
        let cases = [
            (JwtAuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (JwtAuthError::InvalidAuthHeader, StatusCode::UNAUTHORIZED),
            (JwtAuthError::TokenExpired, StatusCode::UNAUTHORIZED),
            (JwtAuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (JwtAuthError::InsufficientPermission, StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_extractor_rejections() {
        let state = state();

        let err = JwtAuth::from_request_parts(&mut parts(None), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, JwtAuthError::MissingToken));

        let err = JwtAuth::from_request_parts(&mut parts(Some("Basic abc")), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, JwtAuthError::InvalidAuthHeader));

        let err = JwtAuth::from_request_parts(&mut parts(Some("Bearer not.a.jwt")), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, JwtAuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_role_extractors() {
        let state = state();
        let ops_header = format!("Bearer {}", token_for(&state, Role::Ops));

        let JwtAuth(claims) = JwtAuth::from_request_parts(&mut parts(Some(&ops_header)), &state)
            .await
            .unwrap();
        assert_eq!(claims.role, Role::Ops);

        assert!(OpsAuth::from_request_parts(&mut parts(Some(&ops_header)), &state)
            .await
            .is_ok());
        assert!(StockViewerAuth::from_request_parts(&mut parts(Some(&ops_header)), &state)
            .await
            .is_ok());
        assert!(matches!(
            AdminAuth::from_request_parts(&mut parts(Some(&ops_header)), &state).await,
            Err(JwtAuthError::InsufficientPermission)
        ));
    }
}
