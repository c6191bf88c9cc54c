//! Stock History Repository
//!
//! 재고 입출고 이력 조회를 담당합니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use stock_core::{Page, Pagination, StockHistoryEntry, TransactionType};

/// 이력 조회 결과 행
#[derive(FromRow)]
struct StockHistoryRow {
    id: i64,
    item_name: String,
    transaction_type: String,
    quantity: i32,
    #[sqlx(default)]
    note: Option<String>,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<StockHistoryRow> for StockHistoryEntry {
    type Error = sqlx::Error;

    fn try_from(row: StockHistoryRow) -> Result<Self, Self::Error> {
        let transaction_type = row
            .transaction_type
            .parse::<TransactionType>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            id: row.id,
            item_name: row.item_name,
            transaction_type,
            quantity: row.quantity,
            note: row.note,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

/// Stock History Repository
pub struct StockHistoryRepository;

impl StockHistoryRepository {
    /// 입출고 이력을 최신순으로 조회합니다.
    ///
    /// `transaction_type`이 `None`이면 전체를 조회합니다.
    pub async fn list(
        pool: &PgPool,
        transaction_type: Option<TransactionType>,
        pagination: Pagination,
    ) -> Result<Page<StockHistoryEntry>, sqlx::Error> {
        let type_filter = transaction_type.map(|t| t.as_str());

        let rows = sqlx::query_as::<_, StockHistoryRow>(
            r#"
            SELECT
                h.id::BIGINT AS id, i.name AS item_name, h.type AS transaction_type,
                h.quantity, h.note, u.username AS created_by, h.created_at
            FROM stock_history h
            JOIN items i ON i.id = h.item_id
            JOIN users u ON u.id = h.user_id
            WHERE ($1::TEXT IS NULL OR h.type = $1)
            ORDER BY h.created_at DESC, h.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(type_filter)
        .bind(i64::from(pagination.limit))
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_history WHERE ($1::TEXT IS NULL OR type = $1)",
        )
        .bind(type_filter)
        .fetch_one(pool)
        .await?;

        let items = rows
            .into_iter()
            .map(StockHistoryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, pagination, total))
    }
}
