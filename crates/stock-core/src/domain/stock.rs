//! 재고 입출고 이력 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 입출고 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// 재고 추가
    In,
    /// 재고 사용
    Out,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IN" => Ok(TransactionType::In),
            "OUT" => Ok(TransactionType::Out),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// 재고 이력 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct StockHistoryEntry {
    pub id: i64,
    /// 품목명
    pub item_name: String,
    /// 입출고 구분
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// 수량 (항상 양수)
    pub quantity: i32,
    /// 메모
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// 등록한 사용자명
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// 기본 페이지 크기.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// 최대 페이지 크기.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// 페이지네이션 파라미터.
///
/// 0이나 누락된 값은 기본값으로, 너무 큰 `limit`은 최대값으로 보정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        Self { page, limit }
    }

    /// SQL OFFSET 값.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// 페이지 단위 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    /// 필터 조건에 맞는 전체 건수
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: i64) -> Self {
        Self {
            items,
            page: pagination.page,
            limit: pagination.limit,
            total,
        }
    }
}
