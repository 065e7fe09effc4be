//! Travel Planner Agent Tools
//!
//! Action-group backend for a travel planning agent:
//! - Flight and hotel searches through a hosted search API
//! - Stock portfolio valuation against a travel budget
//! - Share liquidation planning to raise a target cash amount
//!
//! Every request is stateless. Failures are returned as structured bodies,
//! never as transport-level faults.

pub mod api;
pub mod config;
pub mod error;
pub mod invocation;
pub mod models;
pub mod openapi;
pub mod portfolio;
pub mod search;
pub mod tools;
pub mod travel;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use config::{AppConfig, HoldingsSource};
