//! Liquidation planning
//!
//! Decides how many shares of each holding to sell to raise a target cash
//! amount. Computation runs at full precision; rounding is applied when the
//! plan is serialized.

use crate::error::AgentError;
use crate::models::{Allocation, LiquidationPlan, PortfolioSnapshot, SellStrategy, Valuation};
use crate::Result;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Residual target below which the greedy walk stops.
const TARGET_EPSILON: f64 = 1e-9;

pub fn plan_liquidation(
    snapshot: &PortfolioSnapshot,
    target_amount: f64,
    strategy: SellStrategy,
) -> Result<LiquidationPlan> {
    if !target_amount.is_finite() || target_amount <= 0.0 {
        return Err(AgentError::InvalidToolInput(format!(
            "target_amount must be a positive number, got {}",
            target_amount
        )));
    }

    let total_value = snapshot.total_value;
    if target_amount > total_value {
        return Err(AgentError::InsufficientValue {
            total_value,
            target_amount,
        });
    }

    let allocations = match strategy {
        SellStrategy::Proportional => proportional(snapshot, target_amount),
        SellStrategy::SingleStock => largest_first(snapshot, target_amount),
    };

    debug!(
        strategy = %strategy,
        target_amount,
        holdings_touched = allocations.len(),
        "Liquidation plan computed"
    );

    Ok(LiquidationPlan {
        target_amount,
        strategy,
        allocations,
        total_portfolio_value: total_value,
        remaining_value: total_value - target_amount,
    })
}

/// Sell the same fraction of every holding.
fn proportional(snapshot: &PortfolioSnapshot, target_amount: f64) -> BTreeMap<String, Allocation> {
    let ratio = target_amount / snapshot.total_value;

    snapshot
        .valuations
        .iter()
        .map(|(symbol, valuation)| {
            let shares = valuation.quantity * ratio;
            let allocation = Allocation {
                shares,
                estimated_value: shares * valuation.price,
            };
            (symbol.clone(), allocation)
        })
        .collect()
}

/// Exhaust holdings from the highest value down until the target is met.
/// Equal values are taken in symbol order.
fn largest_first(snapshot: &PortfolioSnapshot, target_amount: f64) -> BTreeMap<String, Allocation> {
    let mut ranked: Vec<&Valuation> = snapshot.valuations.values().collect();
    ranked.sort_by(|a, b| by_value_desc(a, b));

    let mut allocations = BTreeMap::new();
    let mut remaining_target = target_amount;

    for valuation in ranked {
        if remaining_target <= TARGET_EPSILON {
            break;
        }

        if valuation.value >= remaining_target {
            let shares = remaining_target / valuation.price;
            allocations.insert(
                valuation.symbol.clone(),
                Allocation {
                    shares,
                    estimated_value: shares * valuation.price,
                },
            );
            remaining_target = 0.0;
        } else {
            allocations.insert(
                valuation.symbol.clone(),
                Allocation {
                    shares: valuation.quantity,
                    estimated_value: valuation.value,
                },
            );
            remaining_target -= valuation.value;
        }
    }

    allocations
}

fn by_value_desc(a: &Valuation, b: &Valuation) -> Ordering {
    b.value
        .total_cmp(&a.value)
        .then_with(|| a.symbol.cmp(&b.symbol))
}
