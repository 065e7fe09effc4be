//! Portfolio valuation
//!
//! Prices every holding through a `QuoteProvider`. A holding whose quote
//! fails is skipped and recorded; the snapshot is returned regardless.

use super::quotes::{QuoteProvider, QuoteResult};
use crate::error::AgentError;
use crate::models::{Holdings, PortfolioSnapshot, SkippedHolding, Valuation};
use crate::search::SearchOutcome;
use crate::Result;
use tracing::{info, warn};

pub const NO_PORTFOLIO_CONFIGURED: &str = "No portfolio configured";

/// Value `holdings` at current prices. Lookups run concurrently and are
/// merged back in symbol order.
pub async fn value_portfolio(
    holdings: &Holdings,
    quotes: &dyn QuoteProvider,
) -> Result<PortfolioSnapshot> {
    if holdings.is_empty() {
        return Err(AgentError::Configuration(NO_PORTFOLIO_CONFIGURED.to_string()));
    }

    let lookups = holdings.iter().map(|(symbol, quantity)| async move {
        let quote = quotes.lookup(symbol).await;
        (symbol.as_str(), *quantity, quote)
    });
    let results = futures::future::join_all(lookups).await;

    let mut valuations = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();

    for (symbol, quantity, quote) in results {
        match validated_price(quote) {
            Ok(price) => valuations.push(Valuation::new(symbol, quantity, price)),
            Err(reason) => {
                warn!(symbol = %symbol, reason = %reason, "Skipping holding, quote lookup failed");
                skipped.push(SkippedHolding {
                    symbol: symbol.to_string(),
                    reason,
                });
            }
        }
    }

    let snapshot = PortfolioSnapshot::from_valuations(valuations, skipped);

    info!(
        holdings = holdings.len(),
        valued = snapshot.valuations.len(),
        skipped = snapshot.skipped.len(),
        total_value = snapshot.total_value,
        "Portfolio valued"
    );

    Ok(snapshot)
}

fn validated_price(quote: QuoteResult) -> std::result::Result<f64, String> {
    match quote {
        SearchOutcome::Success(price) if price.is_finite() && price >= 0.0 => Ok(price),
        SearchOutcome::Success(price) => Err(format!("Invalid price {}", price)),
        SearchOutcome::ProviderError(message) => Err(message),
        SearchOutcome::Empty => Err("No price in quote response".to_string()),
    }
}
