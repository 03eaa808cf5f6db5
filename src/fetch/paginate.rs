//! Offset-paginated retrieval.
//!
//! Drains an `offset`/`limit` endpoint page by page until a page comes back
//! with an empty `items` list. The empty page is the only stop signal: there
//! is no total-count check, so a spurious empty page ends retrieval early.

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::{decode, redacted, FetchError, JsonFetcher};
use crate::models::MatchRecord;

/// One page of the stats endpoint.
#[derive(Debug, Deserialize)]
struct StatsPage {
    #[serde(default)]
    items: Vec<StatsItem>,
}

#[derive(Debug, Deserialize)]
struct StatsItem {
    stats: MatchRecord,
}

/// A logical endpoint that accepts `offset` and `limit` query parameters.
#[derive(Debug, Clone)]
pub struct PagedEndpoint {
    base: Url,
}

impl PagedEndpoint {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// URL of the page starting at `offset`.
    pub fn page_url(&self, offset: u64, limit: u32) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }
}

/// Fetch every page of `endpoint` and flatten each item's `stats` object
/// into one sequence, preserving page and item order.
///
/// Transport and decode errors propagate as-is; nothing is retried.
pub async fn drain<F>(
    fetcher: &F,
    endpoint: &PagedEndpoint,
    page_size: u32,
) -> Result<Vec<MatchRecord>, FetchError>
where
    F: JsonFetcher + ?Sized,
{
    if page_size == 0 {
        return Err(FetchError::InvalidPageSize(page_size));
    }

    let mut records = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let url = endpoint.page_url(offset, page_size);
        let document = fetcher.get_json(&url).await?;
        let page: StatsPage = decode(&redacted(&url), document)?;

        if page.items.is_empty() {
            break;
        }

        debug!("Page at offset {} returned {} items", offset, page.items.len());
        records.extend(page.items.into_iter().map(|item| item.stats));
        offset += u64::from(page_size);
    }

    info!(
        "Drained {} records from {}",
        records.len(),
        redacted(&endpoint.base)
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use serde_json::{json, Value};

    const BASE: &str = "https://open.faceit.com/data/v4/players/p1/games/cs2/stats";

    fn endpoint() -> PagedEndpoint {
        PagedEndpoint::new(Url::parse(BASE).unwrap())
    }

    fn page(kills: &[u32]) -> Value {
        let items: Vec<Value> = kills
            .iter()
            .map(|k| json!({"stats": {"Kills": k.to_string()}}))
            .collect();
        json!({ "items": items })
    }

    fn url(offset: u64, limit: u32) -> String {
        format!("{}?offset={}&limit={}", BASE, offset, limit)
    }

    #[test]
    fn test_page_url() {
        assert_eq!(endpoint().page_url(200, 100).as_str(), url(200, 100));
    }

    #[tokio::test]
    async fn test_drain_concatenates_pages_in_order() {
        let fetcher = MockFetcher::new()
            .with_json(url(0, 2), page(&[1, 2]))
            .with_json(url(2, 2), page(&[3]))
            .with_json(url(4, 2), page(&[]));

        let records = drain(&fetcher, &endpoint(), 2).await.unwrap();

        let kills: Vec<&str> = records
            .iter()
            .map(|r| r.get("Kills").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(kills, vec!["1", "2", "3"]);
        assert_eq!(fetcher.requests(), vec![url(0, 2), url(2, 2), url(4, 2)]);
    }

    #[tokio::test]
    async fn test_drain_stops_at_first_empty_page() {
        // A later page exists but must never be requested.
        let fetcher = MockFetcher::new()
            .with_json(url(0, 2), page(&[1, 2]))
            .with_json(url(2, 2), page(&[]))
            .with_json(url(4, 2), page(&[9, 9]));

        let records = drain(&fetcher, &endpoint(), 2).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_drain_missing_items_is_empty_page() {
        let fetcher = MockFetcher::new().with_json(url(0, 100), json!({}));
        let records = drain(&fetcher, &endpoint(), 100).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_drain_propagates_transport_error() {
        let fetcher = MockFetcher::new()
            .with_json(url(0, 2), page(&[1, 2]))
            .with_status(url(2, 2), 503);

        let err = drain(&fetcher, &endpoint(), 2).await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_drain_item_without_stats_is_decode_error() {
        let fetcher =
            MockFetcher::new().with_json(url(0, 2), json!({"items": [{"match_id": "m1"}]}));

        let err = drain(&fetcher, &endpoint(), 2).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_drain_rejects_zero_page_size() {
        let fetcher = MockFetcher::new();
        let err = drain(&fetcher, &endpoint(), 0).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidPageSize(0)));
        assert!(fetcher.requests().is_empty());
    }
}
