//! 재고 입출고 이력 조회.

use anyhow::{Context, Result};
use stock_core::{Page, StockHistoryEntry};

use crate::client::{ApiClient, ClientError, HistoryFilter};
use crate::session::SessionStore;

/// 저장된 토큰으로 이력 조회.
pub async fn history(
    client: &ApiClient,
    store: &SessionStore,
    filter: &HistoryFilter,
) -> Result<String> {
    let session = store
        .load()?
        .context("로그인이 필요합니다 (stock login)")?;

    match client.history(&session.token, filter).await {
        Ok(page) => Ok(render_page(&page)),
        Err(ClientError::Unauthorized { code }) => {
            // 서버가 토큰을 거부하면 세션도 버림
            store.clear()?;
            anyhow::bail!("세션이 더 이상 유효하지 않습니다 ({}). 다시 로그인하세요", code)
        }
        Err(ClientError::Forbidden) => {
            anyhow::bail!("{} 역할은 이력을 조회할 수 없습니다", session.role)
        }
        Err(e) => Err(e).context("이력 조회 실패"),
    }
}

/// 표 형식 출력.
pub fn render_page(page: &Page<StockHistoryEntry>) -> String {
    let mut out = format!(
        "{:<6} {:<20} {:<4} {:>8} {:<12} {:<20} {}\n",
        "ID", "ITEM", "TYPE", "QTY", "BY", "AT", "NOTE"
    );
    out.push_str(&"-".repeat(90));
    out.push('\n');

    for entry in &page.items {
        out.push_str(&format!(
            "{:<6} {:<20} {:<4} {:>8} {:<12} {:<20} {}\n",
            entry.id,
            entry.item_name,
            entry.transaction_type.as_str(),
            entry.quantity,
            entry.created_by,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.note.as_deref().unwrap_or("")
        ));
    }

    out.push_str(&format!(
        "page {} / limit {} / total {}",
        page.page, page.limit, page.total
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stock_core::{Pagination, TransactionType};

    #[test]
    fn test_render_page() {
        let entry = StockHistoryEntry {
            id: 3,
            item_name: "볼트 M8".to_string(),
            transaction_type: TransactionType::In,
            quantity: 120,
            note: Some("입고".to_string()),
            created_by: "bob".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        };
        let page = Page::new(vec![entry], Pagination::default(), 1);

        let output = render_page(&page);
        assert!(output.contains("볼트 M8"));
        assert!(output.contains("IN"));
        assert!(output.contains("2024-05-01 09:30"));
        assert!(output.ends_with("page 1 / limit 10 / total 1"));
    }

    #[tokio::test]
    async fn test_history_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();

        let err = history(&client, &store, &HistoryFilter::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("로그인이 필요합니다"));
    }
}
