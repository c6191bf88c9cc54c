//! JWT 액세스 토큰 발급 및 검증.
//!
//! 서명 키와 유효 시간은 서버 시작 시 한 번 정해지며, [`TokenIssuer`]는
//! 불변 값으로 `Arc` 뒤에서 모든 요청이 공유합니다.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use stock_core::{Claims, Principal};

/// HS256 서명 키 최소 길이 (바이트).
pub const MIN_SECRET_LEN: usize = 32;

/// 토큰 유효 시간 상한 (분, 7일).
pub const MAX_TTL_MINUTES: i64 = 7 * 24 * 60;

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT 서명 키가 설정되지 않았습니다")]
    MissingSecret,
    #[error("JWT 서명 키가 너무 짧습니다: {0}바이트 (최소 32바이트)")]
    SecretTooShort(usize),
    #[error("토큰 유효 시간이 올바르지 않습니다: {0}분 (1 ~ 10080분)")]
    InvalidTtl(i64),
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// 서명된 토큰과 그 페이로드.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// 액세스 토큰 발급기.
///
/// 자격증명 저장소에 접근하지 않습니다. 인증이 끝난 [`Principal`]만 받습니다.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_minutes: i64,
}

impl TokenIssuer {
    /// 서명 키와 유효 시간(분)으로 발급기를 생성합니다.
    ///
    /// 키가 없거나 32바이트 미만이면 실패합니다.
    /// 유효 시간이 0 이하이거나 [`MAX_TTL_MINUTES`]를 넘어도 실패합니다.
    /// 서버는 이 경우 시작하지 않습니다.
    pub fn new(secret: Option<&SecretString>, ttl_minutes: i64) -> Result<Self, JwtError> {
        if !(1..=MAX_TTL_MINUTES).contains(&ttl_minutes) {
            return Err(JwtError::InvalidTtl(ttl_minutes));
        }

        let secret = secret.ok_or(JwtError::MissingSecret)?.expose_secret();
        if secret.trim().is_empty() {
            return Err(JwtError::MissingSecret);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::SecretTooShort(secret.len()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_minutes,
        })
    }

    /// 토큰 유효 시간 (분).
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// 인증된 사용자에게 액세스 토큰을 발급합니다.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_principal(principal, self.ttl_minutes);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(IssuedToken { token, claims })
    }

    /// 토큰 서명과 만료 시간을 검증하고 페이로드를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError,
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_core::{PrincipalId, Role};

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(Some(&SecretString::from(secret)), 60).unwrap()
    }

    fn alice() -> Principal {
        Principal {
            id: PrincipalId(1),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer(TEST_SECRET);
        let issued = issuer.issue(&alice()).unwrap();

        assert_eq!(issued.claims.role, Role::Admin);
        assert_eq!(issued.claims.sub, "1");

        let claims = issuer.verify(&issued.token).unwrap();
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.principal_id(), Some(PrincipalId(1)));
    }

    #[test]
    fn test_missing_or_short_secret() {
        assert!(matches!(
            TokenIssuer::new(None, 60),
            Err(JwtError::MissingSecret)
        ));
        assert!(matches!(
            TokenIssuer::new(Some(&SecretString::from("   ")), 60),
            Err(JwtError::MissingSecret)
        ));
        assert!(matches!(
            TokenIssuer::new(Some(&SecretString::from("short")), 60),
            Err(JwtError::SecretTooShort(5))
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = issuer(TEST_SECRET);
        let token = issuer.issue(&alice()).unwrap().token;

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = parts[1].clone();
        let mut bytes = payload.into_bytes();
        let idx = bytes.len() / 2;
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(bytes).unwrap();

        assert!(issuer.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn test_ttl_out_of_range() {
        let secret = SecretString::from(TEST_SECRET);

        assert!(matches!(
            TokenIssuer::new(Some(&secret), 0),
            Err(JwtError::InvalidTtl(0))
        ));
        assert!(matches!(
            TokenIssuer::new(Some(&secret), -30),
            Err(JwtError::InvalidTtl(-30))
        ));
        assert!(matches!(
            TokenIssuer::new(Some(&secret), 1_000_000_000_000),
            Err(JwtError::InvalidTtl(_))
        ));

        let longest = TokenIssuer::new(Some(&secret), MAX_TTL_MINUTES).unwrap();
        let issued = longest.issue(&alice()).unwrap();
        assert_eq!(issued.claims.exp - issued.claims.iat, MAX_TTL_MINUTES * 60);
    }

    #[test]
    fn test_expired_token() {
        let issuer = issuer(TEST_SECRET);
        let claims = Claims::new("1", "alice", Role::Admin, -10);
        let token = encode(&Header::default(), &claims, &issuer.encoding_key).unwrap();

        assert!(matches!(issuer.verify(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let issuer = issuer(TEST_SECRET);
        assert!(issuer.verify("invalid.token.here").is_err());
        assert!(issuer.verify("").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = issuer(TEST_SECRET).issue(&alice()).unwrap().token;
        let other = issuer("wrong-secret-key-for-testing-minimum-32-chars");

        assert!(matches!(other.verify(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", issuer(TEST_SECRET));
        assert!(!debug.contains(TEST_SECRET));
    }
}
