//! Stock portfolio: valuation, liquidation planning and budget checks

pub mod affordability;
pub mod liquidation;
pub mod quotes;
pub mod valuator;

pub use affordability::check_affordability;
pub use liquidation::plan_liquidation;
pub use quotes::{QuoteProvider, QuoteResult, SearchQuoteProvider, StaticQuoteProvider};
pub use valuator::{value_portfolio, NO_PORTFOLIO_CONFIGURED};
