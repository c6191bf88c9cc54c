//! 재고 이력 endpoint.
//!
//! admin, ops 역할 모두 조회할 수 있습니다.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stock_core::{Page, Pagination, StockHistoryEntry, TransactionType};
use tracing::{debug, error};
use utoipa::IntoParams;

use crate::auth::StockViewerAuth;
use crate::error::{codes, ApiErrorResponse, ApiResult};
use crate::repository::StockHistoryRepository;
use crate::state::AppState;

/// 이력 조회 쿼리.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// 입출고 구분 필터 ("IN" | "OUT")
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// 페이지 번호 (기본 1)
    pub page: Option<u32>,
    /// 페이지 크기 (기본 10, 최대 100)
    pub limit: Option<u32>,
}

impl HistoryQuery {
    /// 필터와 페이지네이션으로 해석합니다.
    fn parse(&self) -> Result<(Option<TransactionType>, Pagination), ApiErrorResponse> {
        let transaction_type = self
            .transaction_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::parse::<TransactionType>)
            .transpose()
            .map_err(|_| {
                ApiErrorResponse::new(codes::VALIDATION_ERROR, "type은 IN 또는 OUT이어야 합니다")
            })?;

        Ok((transaction_type, Pagination::new(self.page, self.limit)))
    }
}

/// 재고 입출고 이력 조회.
///
/// GET /api/v1/stock/history
#[utoipa::path(
    get,
    path = "/api/v1/stock/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "이력 목록", body = Page<StockHistoryEntry>),
        (status = 400, description = "잘못된 쿼리", body = ApiErrorResponse),
        (status = 401, description = "토큰 누락 또는 무효", body = ApiErrorResponse),
        (status = 403, description = "권한 부족", body = ApiErrorResponse),
        (status = 503, description = "데이터베이스 미설정", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "stock"
)]
pub async fn list_history(
    StockViewerAuth(claims): StockViewerAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Page<StockHistoryEntry>>> {
    let (transaction_type, pagination) = query
        .parse()
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))?;

    let pool = state.db_pool.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiErrorResponse::new(
                codes::DB_NOT_CONFIGURED,
                "Database not configured",
            )),
        )
    })?;

    debug!(
        user = %claims.username,
        filter = ?transaction_type,
        page = pagination.page,
        limit = pagination.limit,
        "Listing stock history"
    );

    let page = StockHistoryRepository::list(pool, transaction_type, pagination)
        .await
        .map_err(|e| {
            error!(error = %e, "Stock history query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::internal()),
            )
        })?;

    Ok(Json(page))
}

/// 재고 라우터 생성.
pub fn stock_router() -> Router<Arc<AppState>> {
    Router::new().route("/history", get(list_history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{body::Body, http::Request};
    use stock_core::{Principal, PrincipalId, Role};
    use tower::ServiceExt;

    fn bearer(state: &AppState, role: Role) -> String {
        let principal = Principal {
            id: PrincipalId(9),
            username: "tester".to_string(),
            email: "tester@example.com".to_string(),
            role,
        };
        format!("Bearer {}", state.tokens.issue(&principal).unwrap().token)
    }

    async fn get_history(uri: &str, auth: Option<String>) -> StatusCode {
        let state = Arc::new(create_test_state());
        let app = Router::new()
            .nest("/api/v1/stock", stock_router())
            .with_state(state);

        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_query_parse() {
        let query = HistoryQuery {
            transaction_type: Some("out".to_string()),
            page: Some(2),
            limit: Some(1000),
        };
        let (filter, pagination) = query.parse().unwrap();
        assert_eq!(filter, Some(TransactionType::Out));
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.limit, 100);

        let invalid = HistoryQuery {
            transaction_type: Some("MOVE".to_string()),
            ..Default::default()
        };
        assert!(invalid.parse().is_err());

        let (filter, pagination) = HistoryQuery::default().parse().unwrap();
        assert_eq!(filter, None);
        assert_eq!(pagination, Pagination::default());
    }

    #[tokio::test]
    async fn test_history_requires_token() {
        assert_eq!(
            get_history("/api/v1/stock/history", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_history_without_database() {
        let state = create_test_state();
        let status = get_history("/api/v1/stock/history?type=IN", Some(bearer(&state, Role::Ops))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_history_rejects_bad_type() {
        let state = create_test_state();
        let status =
            get_history("/api/v1/stock/history?type=MOVE", Some(bearer(&state, Role::Admin))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
