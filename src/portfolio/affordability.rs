//! Travel budget check against portfolio value

use crate::models::Affordability;

/// Compare portfolio value with an optional travel budget. Exactly meeting
/// the budget counts as affordable.
pub fn check_affordability(total_value: f64, budget: Option<f64>) -> Option<Affordability> {
    budget.map(|travel_budget| Affordability {
        travel_budget,
        can_afford: total_value >= travel_budget,
        remaining: total_value - travel_budget,
    })
}
