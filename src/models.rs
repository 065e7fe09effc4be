//! Core data models for the travel planner agent

use crate::error::AgentError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

//
// ================= Rounding =================
//

/// Round a monetary or share figure to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serde hook: figures keep full precision internally and are rounded
/// only when they leave the process.
pub fn serialize_rounded<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round2(*value))
}

//
// ================= Holdings =================
//

/// Symbol → quantity owned. Ordered by symbol so every walk over the
/// portfolio is deterministic.
pub type Holdings = BTreeMap<String, f64>;

//
// ================= Valuation =================
//

/// Serialized under its symbol key, so the symbol itself is not emitted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Valuation {
    #[serde(skip)]
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub value: f64,
}

impl Valuation {
    pub fn new(symbol: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
            value: price * quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedHolding {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioSnapshot {
    #[serde(rename = "stocks")]
    pub valuations: BTreeMap<String, Valuation>,
    #[serde(serialize_with = "serialize_rounded")]
    pub total_value: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedHolding>,
}

impl PortfolioSnapshot {
    pub fn from_valuations(valuations: Vec<Valuation>, skipped: Vec<SkippedHolding>) -> Self {
        let total_value = valuations.iter().fold(0.0, |acc, v| acc + v.value);
        let valuations = valuations
            .into_iter()
            .map(|v| (v.symbol.clone(), v))
            .collect();

        Self {
            valuations,
            total_value,
            skipped,
        }
    }
}

//
// ================= Liquidation =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SellStrategy {
    /// Sell the same fraction of every holding.
    #[default]
    Proportional,
    /// Exhaust the highest-value holding before touching the next.
    SingleStock,
}

impl SellStrategy {
    pub const ACCEPTED: &'static [&'static str] = &["proportional", "single_stock"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SellStrategy::Proportional => "proportional",
            SellStrategy::SingleStock => "single_stock",
        }
    }
}

impl fmt::Display for SellStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SellStrategy {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proportional" => Ok(SellStrategy::Proportional),
            "single_stock" | "single-stock" => Ok(SellStrategy::SingleStock),
            other => Err(AgentError::InvalidToolInput(format!(
                "Unknown strategy '{}', expected one of: {}",
                other,
                Self::ACCEPTED.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    #[serde(serialize_with = "serialize_rounded")]
    pub shares: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub estimated_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidationPlan {
    pub target_amount: f64,
    pub strategy: SellStrategy,
    #[serde(rename = "shares_to_sell")]
    pub allocations: BTreeMap<String, Allocation>,
    #[serde(serialize_with = "serialize_rounded")]
    pub total_portfolio_value: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub remaining_value: f64,
}

impl LiquidationPlan {
    pub fn allocated_value(&self) -> f64 {
        self.allocations
            .values()
            .fold(0.0, |acc, a| acc + a.estimated_value)
    }
}

//
// ================= Affordability =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Affordability {
    pub travel_budget: f64,
    #[serde(rename = "can_afford_travel")]
    pub can_afford: bool,
    #[serde(rename = "remaining_after_travel", serialize_with = "serialize_rounded")]
    pub remaining: f64,
}

/// Body returned by the portfolio check.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    #[serde(flatten)]
    pub snapshot: PortfolioSnapshot,
    #[serde(flatten)]
    pub affordability: Option<Affordability>,
}

//
// ================= Travel =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightQuote {
    pub flights: Vec<serde_json::Value>,
    pub num_passengers: u32,
    #[serde(serialize_with = "serialize_rounded")]
    pub total_cost: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub per_passenger_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelListing {
    pub properties: Vec<serde_json::Value>,
}

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub data: serde_json::Value,
    pub error: Option<String>,
}

impl ToolOutput {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

/// Describes one query parameter a tool accepts.
#[derive(Debug, Clone, Copy)]
pub struct ToolParameter {
    pub name: &'static str,
    pub param_type: ParamType,
    pub required: bool,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(149.999), 150.0);
        assert_eq!(round2(-12.344), -12.34);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("proportional".parse::<SellStrategy>().unwrap(), SellStrategy::Proportional);
        assert_eq!(" Single_Stock ".parse::<SellStrategy>().unwrap(), SellStrategy::SingleStock);

        let err = "minimize_tax_impact".parse::<SellStrategy>().unwrap_err();
        assert!(err.to_string().contains("proportional, single_stock"));
    }

    #[test]
    fn test_plan_serializes_rounded_figures() {
        let mut allocations = BTreeMap::new();
        allocations.insert(
            "AAPL".to_string(),
            Allocation {
                shares: 1.0 / 3.0,
                estimated_value: 100.0 / 3.0,
            },
        );
        let plan = LiquidationPlan {
            target_amount: 33.333,
            strategy: SellStrategy::SingleStock,
            allocations,
            total_portfolio_value: 1000.004,
            remaining_value: 966.671,
        };

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["strategy"], json!("single_stock"));
        assert_eq!(value["shares_to_sell"]["AAPL"]["shares"], json!(0.33));
        assert_eq!(value["shares_to_sell"]["AAPL"]["estimated_value"], json!(33.33));
        assert_eq!(value["total_portfolio_value"], json!(1000.0));
        assert_eq!(value["remaining_value"], json!(966.67));
    }

    #[test]
    fn test_snapshot_keys_valuations_by_symbol() {
        let snapshot = PortfolioSnapshot::from_valuations(
            vec![Valuation::new("AAPL", 3.0, 10.0), Valuation::new("VTI", 1.0, 5.0)],
            vec![],
        );
        assert_eq!(snapshot.valuations["AAPL"].symbol, "AAPL");

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value["stocks"]["AAPL"],
            json!({"quantity": 3.0, "price": 10.0, "value": 30.0})
        );
        assert_eq!(value["total_value"], json!(35.0));
    }

    #[test]
    fn test_report_omits_affordability_without_budget() {
        let snapshot = PortfolioSnapshot::from_valuations(
            vec![Valuation::new("MSFT", 2.0, 410.5)],
            vec![],
        );
        let report = PortfolioReport {
            snapshot: snapshot.clone(),
            affordability: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_value"], json!(821.0));
        assert_eq!(value["stocks"]["MSFT"]["quantity"], json!(2.0));
        assert!(value.get("can_afford_travel").is_none());
        assert!(value.get("skipped").is_none());

        let report = PortfolioReport {
            snapshot,
            affordability: Some(Affordability {
                travel_budget: 900.0,
                can_afford: false,
                remaining: -79.0,
            }),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["can_afford_travel"], json!(false));
        assert_eq!(value["remaining_after_travel"], json!(-79.0));
        assert_eq!(value["travel_budget"], json!(900.0));
    }
}
