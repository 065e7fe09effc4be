//! Portfolio tools: value check against a travel budget, and shares to sell

use super::params::{ensure_object_parameters, optional_f64, optional_str, require_f64};
use super::Tool;
use crate::config::HoldingsSource;
use crate::error::AgentError;
use crate::models::{ParamType, PortfolioReport, SellStrategy, ToolInput, ToolOutput, ToolParameter};
use crate::portfolio::{check_affordability, plan_liquidation, value_portfolio, QuoteProvider};
use crate::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

static CHECK_PORTFOLIO_PARAMETERS: &[ToolParameter] = &[ToolParameter {
    name: "travel_budget",
    param_type: ParamType::Number,
    required: false,
    description: "Estimated travel budget to compare against portfolio value",
}];

static SHARES_TO_SELL_PARAMETERS: &[ToolParameter] = &[
    ToolParameter {
        name: "target_amount",
        param_type: ParamType::Number,
        required: true,
        description: "The target amount needed from selling shares",
    },
    ToolParameter {
        name: "strategy",
        param_type: ParamType::String,
        required: false,
        description: "Strategy for selling shares: 'proportional' (sell equal percentage from each) or 'single_stock' (sell from highest value stock first). Defaults to proportional.",
    },
];

pub struct CheckPortfolioTool {
    holdings: Arc<dyn HoldingsSource>,
    quotes: Arc<dyn QuoteProvider>,
}

impl CheckPortfolioTool {
    pub fn new(holdings: Arc<dyn HoldingsSource>, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self { holdings, quotes }
    }
}

#[async_trait::async_trait]
impl Tool for CheckPortfolioTool {
    fn name(&self) -> &'static str {
        "check_portfolio"
    }

    fn description(&self) -> &'static str {
        "Check stock portfolio value and compare with travel budget using Google Finance"
    }

    fn parameters(&self) -> &'static [ToolParameter] {
        CHECK_PORTFOLIO_PARAMETERS
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        ensure_object_parameters(input)?;
        let budget = optional_f64(input, "travel_budget")?;

        let holdings = self.holdings.load()?;
        let snapshot = value_portfolio(&holdings, self.quotes.as_ref()).await?;
        let affordability = check_affordability(snapshot.total_value, budget);

        if let Some(check) = &affordability {
            info!(
                total_value = snapshot.total_value,
                travel_budget = check.travel_budget,
                can_afford = check.can_afford,
                "Travel budget checked"
            );
        }

        let report = PortfolioReport {
            snapshot,
            affordability,
        };

        Ok(ToolOutput::ok(serde_json::to_value(report)?))
    }
}

pub struct CalculateSharesToSellTool {
    holdings: Arc<dyn HoldingsSource>,
    quotes: Arc<dyn QuoteProvider>,
}

impl CalculateSharesToSellTool {
    pub fn new(holdings: Arc<dyn HoldingsSource>, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self { holdings, quotes }
    }
}

#[async_trait::async_trait]
impl Tool for CalculateSharesToSellTool {
    fn name(&self) -> &'static str {
        "calculate_shares_to_sell"
    }

    fn description(&self) -> &'static str {
        "Calculate how many shares of each stock to sell to meet a target amount"
    }

    fn parameters(&self) -> &'static [ToolParameter] {
        SHARES_TO_SELL_PARAMETERS
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        ensure_object_parameters(input)?;
        let target_amount = require_f64(input, "target_amount")?;
        let strategy = match optional_str(input, "strategy")? {
            Some(name) => name.parse::<SellStrategy>()?,
            None => SellStrategy::default(),
        };

        let holdings = self.holdings.load()?;
        let snapshot = value_portfolio(&holdings, self.quotes.as_ref()).await?;
        let plan = plan_liquidation(&snapshot, target_amount, strategy)?;

        info!(
            strategy = %plan.strategy,
            target_amount = plan.target_amount,
            holdings_sold = plan.allocations.len(),
            "Shares to sell calculated"
        );

        Ok(ToolOutput::ok(serde_json::to_value(plan)?))
    }

    fn failure_body(&self, error: &AgentError) -> Value {
        let mut body = json!({
            "error": error.to_string(),
            "shares_to_sell": {},
        });

        if let AgentError::InsufficientValue {
            total_value,
            target_amount,
        } = error
        {
            body["total_portfolio_value"] = json!(total_value);
            body["target_amount"] = json!(target_amount);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticHoldings;
    use crate::portfolio::StaticQuoteProvider;

    fn input(parameters: Value) -> ToolInput {
        ToolInput { parameters }
    }

    fn portfolio() -> (Arc<dyn HoldingsSource>, Arc<dyn QuoteProvider>) {
        let (holdings, quotes) =
            StaticQuoteProvider::holdings_at([("A", 10.0, 50.0), ("B", 5.0, 100.0)]);
        (Arc::new(StaticHoldings(holdings)), Arc::new(quotes))
    }

    #[tokio::test]
    async fn test_check_portfolio_with_budget() {
        let (holdings, quotes) = portfolio();
        let tool = CheckPortfolioTool::new(holdings, quotes);

        let output = tool
            .execute(&input(json!({"travel_budget": "1000"})))
            .await
            .unwrap();

        assert_eq!(output.data["total_value"], json!(1000.0));
        assert_eq!(output.data["stocks"]["A"]["value"], json!(500.0));
        assert_eq!(output.data["can_afford_travel"], json!(true));
        assert_eq!(output.data["remaining_after_travel"], json!(0.0));
    }

    #[tokio::test]
    async fn test_check_portfolio_without_holdings() {
        let tool = CheckPortfolioTool::new(
            Arc::new(StaticHoldings::default()),
            Arc::new(StaticQuoteProvider::default()),
        );

        let err = tool.execute(&input(json!({}))).await.unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
        assert_eq!(tool.failure_body(&err), json!({"error": "No portfolio configured"}));
    }

    #[tokio::test]
    async fn test_shares_to_sell_proportional_by_default() {
        let (holdings, quotes) = portfolio();
        let tool = CalculateSharesToSellTool::new(holdings, quotes);

        let output = tool
            .execute(&input(json!({"target_amount": 300})))
            .await
            .unwrap();

        assert_eq!(output.data["strategy"], json!("proportional"));
        assert_eq!(output.data["target_amount"], json!(300.0));
        assert_eq!(output.data["shares_to_sell"]["A"]["shares"], json!(3.0));
        assert_eq!(output.data["shares_to_sell"]["B"]["shares"], json!(1.5));
        assert_eq!(output.data["shares_to_sell"]["B"]["estimated_value"], json!(150.0));
        assert_eq!(output.data["remaining_value"], json!(700.0));
    }

    #[tokio::test]
    async fn test_shares_to_sell_insufficient_value_body() {
        let (holdings, quotes) = portfolio();
        let tool = CalculateSharesToSellTool::new(holdings, quotes);

        let err = tool
            .execute(&input(json!({"target_amount": "2500", "strategy": "single_stock"})))
            .await
            .unwrap_err();

        let body = tool.failure_body(&err);
        assert_eq!(body["shares_to_sell"], json!({}));
        assert_eq!(body["total_portfolio_value"], json!(1000.0));
        assert_eq!(body["target_amount"], json!(2500.0));
        assert!(body["error"].as_str().unwrap().starts_with("Insufficient portfolio value"));
    }

    #[tokio::test]
    async fn test_shares_to_sell_rejects_unknown_strategy() {
        let (holdings, quotes) = portfolio();
        let tool = CalculateSharesToSellTool::new(holdings, quotes);

        let err = tool
            .execute(&input(json!({"target_amount": 100, "strategy": "minimize_tax_impact"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidToolInput(_)));
    }
}
