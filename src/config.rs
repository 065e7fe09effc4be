//! Runtime configuration
//!
//! Everything is read from the process environment (optionally seeded from
//! `.env`). Holdings are not cached: a `HoldingsSource` is consulted on every
//! portfolio request.

use crate::error::AgentError;
use crate::models::Holdings;
use crate::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_SEARCH_API_BASE_URL: &str = "https://serpapi.com/search.json";
pub const DEFAULT_PORTFOLIO_VAR: &str = "STOCK_PORTFOLIO";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct AppConfig {
    pub search_api_key: String,
    pub search_api_base_url: String,
    pub search_timeout: Duration,
    pub portfolio_var: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT").or_else(|_| env::var("API_PORT")) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                AgentError::Configuration(format!("PORT must be a valid u16, got '{}'", raw))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let search_timeout = env::var("SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT_SECS);

        Ok(Self {
            search_api_key: env::var("API_KEY").unwrap_or_default(),
            search_api_base_url: env::var("SEARCH_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_API_BASE_URL.to_string()),
            search_timeout: Duration::from_secs(search_timeout),
            portfolio_var: env::var("STOCK_PORTFOLIO_VAR")
                .unwrap_or_else(|_| DEFAULT_PORTFOLIO_VAR.to_string()),
            port,
        })
    }

    pub fn holdings_source(&self) -> EnvHoldings {
        EnvHoldings::new(self.portfolio_var.clone())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("search_api_key", &if self.search_api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("search_api_base_url", &self.search_api_base_url)
            .field("search_timeout", &self.search_timeout)
            .field("portfolio_var", &self.portfolio_var)
            .field("port", &self.port)
            .finish()
    }
}

/// Supplies the holdings mapping at request time.
pub trait HoldingsSource: Send + Sync {
    fn load(&self) -> Result<Holdings>;
}

/// Reads a JSON object of symbol → quantity from an environment variable.
/// A missing variable is treated as `{}`.
#[derive(Debug, Clone)]
pub struct EnvHoldings {
    var: String,
}

impl EnvHoldings {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl HoldingsSource for EnvHoldings {
    fn load(&self) -> Result<Holdings> {
        let raw = env::var(&self.var).unwrap_or_else(|_| "{}".to_string());
        parse_holdings(&raw)
    }
}

/// Fixed holdings, used by tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct StaticHoldings(pub Holdings);

impl HoldingsSource for StaticHoldings {
    fn load(&self) -> Result<Holdings> {
        Ok(self.0.clone())
    }
}

pub fn parse_holdings(raw: &str) -> Result<Holdings> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Holdings::new());
    }

    let parsed: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
        .map_err(|e| AgentError::Configuration(format!("Portfolio must be a JSON object: {}", e)))?;

    let mut holdings = Holdings::new();
    for (symbol, quantity) in parsed {
        let quantity = quantity
            .as_f64()
            .filter(|q| q.is_finite() && *q >= 0.0)
            .ok_or_else(|| {
                AgentError::Configuration(format!(
                    "Quantity for {} must be a non-negative number, got {}",
                    symbol, quantity
                ))
            })?;

        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(AgentError::Configuration(
                "Portfolio contains an empty symbol".to_string(),
            ));
        }
        if holdings.insert(trimmed.to_string(), quantity).is_some() {
            return Err(AgentError::Configuration(format!(
                "Portfolio lists {} more than once",
                trimmed
            )));
        }
    }

    Ok(holdings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_holdings() {
        let holdings = parse_holdings(r#"{"AAPL": 10, "MSFT": 2.5}"#).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings["AAPL"], 10.0);
        assert_eq!(holdings["MSFT"], 2.5);
    }

    #[test]
    fn test_parse_holdings_empty_is_not_an_error() {
        assert!(parse_holdings("{}").unwrap().is_empty());
        assert!(parse_holdings("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_holdings_rejects_bad_quantities() {
        assert!(matches!(
            parse_holdings(r#"{"AAPL": -1}"#),
            Err(AgentError::Configuration(_))
        ));
        assert!(matches!(
            parse_holdings(r#"{"AAPL": "ten"}"#),
            Err(AgentError::Configuration(_))
        ));
        assert!(matches!(
            parse_holdings(r#"["AAPL"]"#),
            Err(AgentError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_holdings_rejects_blank_and_colliding_symbols() {
        match parse_holdings(r#"{"AAPL": 1, " AAPL": 2}"#) {
            Err(AgentError::Configuration(message)) => {
                assert_eq!(message, "Portfolio lists AAPL more than once")
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert!(matches!(
            parse_holdings(r#"{"": 1}"#),
            Err(AgentError::Configuration(_))
        ));
        assert!(matches!(
            parse_holdings(r#"{"  ": 1, "MSFT": 2}"#),
            Err(AgentError::Configuration(_))
        ));
        assert_eq!(parse_holdings(r#"{" VTI ": 3}"#).unwrap()["VTI"], 3.0);
    }

    #[test]
    fn test_env_holdings_reread_on_every_load() {
        let var = "TRAVEL_PLANNER_TEST_PORTFOLIO";
        let source = EnvHoldings::new(var);

        env::remove_var(var);
        assert!(source.load().unwrap().is_empty());

        env::set_var(var, r#"{"NVDA": 4}"#);
        assert_eq!(source.load().unwrap()["NVDA"], 4.0);

        env::set_var(var, r#"{"NVDA": 4, "AMZN": 1}"#);
        assert_eq!(source.load().unwrap().len(), 2);

        env::remove_var(var);
    }
}
