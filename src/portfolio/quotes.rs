//! Quote providers
//!
//! A quote provider turns a ticker symbol into a current price. It never
//! fails the caller: every failure is reported as a `QuoteResult` variant.

use crate::models::Holdings;
use crate::search::{parse_price, SearchApi, SearchEngine, SearchOutcome, SearchRequest};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type QuoteResult = SearchOutcome<f64>;

#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn lookup(&self, symbol: &str) -> QuoteResult;
}

/// Quotes from the search API's finance engine.
pub struct SearchQuoteProvider {
    api: Arc<dyn SearchApi>,
}

impl SearchQuoteProvider {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl QuoteProvider for SearchQuoteProvider {
    async fn lookup(&self, symbol: &str) -> QuoteResult {
        let request = SearchRequest::new(SearchEngine::GoogleFinance).param("q", symbol);

        match self.api.search(&request).await {
            Ok(body) => SearchOutcome::from_response(&body, extract_price),
            Err(e) => SearchOutcome::ProviderError(e.to_string()),
        }
    }
}

/// Top-level `price`, falling back to the summary block the finance
/// engine returns for a single ticker.
fn extract_price(body: &Value) -> Option<f64> {
    body.get("price")
        .and_then(parse_price)
        .or_else(|| {
            let summary = body.get("summary")?;
            summary
                .get("extracted_price")
                .and_then(parse_price)
                .or_else(|| summary.get("price").and_then(parse_price))
        })
}

/// Fixed prices; symbols without a price report a provider error.
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteProvider {
    prices: HashMap<String, f64>,
}

impl StaticQuoteProvider {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            prices: pairs
                .into_iter()
                .map(|(symbol, price)| (symbol.to_string(), price))
                .collect(),
        }
    }

    pub fn holdings_at<'a>(pairs: impl IntoIterator<Item = (&'a str, f64, f64)>) -> (Holdings, Self) {
        let mut holdings = Holdings::new();
        let mut prices = HashMap::new();
        for (symbol, quantity, price) in pairs {
            holdings.insert(symbol.to_string(), quantity);
            prices.insert(symbol.to_string(), price);
        }
        (holdings, Self { prices })
    }
}

#[async_trait::async_trait]
impl QuoteProvider for StaticQuoteProvider {
    async fn lookup(&self, symbol: &str) -> QuoteResult {
        match self.prices.get(symbol) {
            Some(price) => SearchOutcome::Success(*price),
            None => SearchOutcome::ProviderError(format!("No quote for {}", symbol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::StaticSearchApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_quote_provider_classifies_responses() {
        let api = Arc::new(
            StaticSearchApi::new()
                .with_query_response(SearchEngine::GoogleFinance, "AAPL", json!({"price": "$189.50"}))
                .with_query_response(
                    SearchEngine::GoogleFinance,
                    "GOOG",
                    json!({"summary": {"title": "Alphabet", "extracted_price": 172.3}}),
                )
                .with_query_response(SearchEngine::GoogleFinance, "BAD", json!({"price": "n/a"}))
                .with_query_response(
                    SearchEngine::GoogleFinance,
                    "NOPE",
                    json!({"error": "Google Finance hasn't returned any results for this query."}),
                ),
        );
        let provider = SearchQuoteProvider::new(api.clone());

        assert_eq!(provider.lookup("AAPL").await, SearchOutcome::Success(189.5));
        assert_eq!(provider.lookup("GOOG").await, SearchOutcome::Success(172.3));
        assert_eq!(provider.lookup("BAD").await, SearchOutcome::Empty);
        assert!(matches!(
            provider.lookup("NOPE").await,
            SearchOutcome::ProviderError(_)
        ));
        // Transport failures also surface as provider errors.
        assert!(matches!(
            provider.lookup("MISSING").await,
            SearchOutcome::ProviderError(_)
        ));

        let requests = api.requests();
        assert_eq!(requests.len(), 5);
        assert!(requests.iter().all(|r| r.engine == SearchEngine::GoogleFinance));
        assert_eq!(requests[0].get("q"), Some("AAPL"));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticQuoteProvider::from_pairs([("A", 50.0)]);
        assert_eq!(provider.lookup("A").await, SearchOutcome::Success(50.0));
        assert!(matches!(provider.lookup("B").await, SearchOutcome::ProviderError(_)));
    }
}
