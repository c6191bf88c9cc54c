//! 재고 API HTTP 클라이언트.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use stock_core::{Page, StockHistoryEntry, TransactionType};
use thiserror::Error;
use tracing::debug;

/// 기본 API 주소.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// 클라이언트 에러.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("아이디 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    #[error("인증이 필요합니다 ({code})")]
    Unauthorized { code: String },

    #[error("권한이 없습니다")]
    Forbidden,

    #[error("API 오류 {status}: {code} - {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },
}

/// 서버 에러 응답 본문.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    secret: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    access_token: String,
}

/// 이력 조회 조건.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub transaction_type: Option<TransactionType>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl HistoryFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(t) = self.transaction_type {
            pairs.push(("type", t.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// 재고 API 클라이언트.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("stock-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 로그인 후 액세스 토큰 반환.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/api/v1/auth/login"))
            .json(&LoginBody {
                identifier,
                secret: secret.expose_secret(),
            })
            .send()
            .await?;

        debug!(status = %response.status(), "Login response");

        match response.status() {
            StatusCode::OK => Ok(response.json::<LoginReply>().await?.access_token),
            StatusCode::UNAUTHORIZED => Err(ClientError::InvalidCredentials),
            status => Err(Self::api_error(status, response).await),
        }
    }

    /// 재고 입출고 이력 조회.
    pub async fn history(
        &self,
        token: &str,
        filter: &HistoryFilter,
    ) -> Result<Page<StockHistoryEntry>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/v1/stock/history"))
            .bearer_auth(token)
            .query(&filter.query_pairs())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => {
                let code = response
                    .json::<ErrorBody>()
                    .await
                    .map(|b| b.code)
                    .unwrap_or_else(|_| "UNAUTHORIZED".to_string());
                Err(ClientError::Unauthorized { code })
            }
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden),
            status => Err(Self::api_error(status, response).await),
        }
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> ClientError {
        match response.json::<ErrorBody>().await {
            Ok(body) => ClientError::Api {
                status,
                code: body.code,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status,
                code: "UNKNOWN".to_string(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string(),
            },
        }
    }
}
