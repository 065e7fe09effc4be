//! Tool trait and registry
//!
//! Each agent operation is a tool. Tools validate their own parameters and
//! return structured bodies; `run_tool` is the boundary that turns every
//! failure (including panics) into a well-formed response.

use crate::config::{AppConfig, HoldingsSource};
use crate::error::AgentError;
use crate::models::{ToolInput, ToolOutput, ToolParameter};
use crate::portfolio::{QuoteProvider, SearchQuoteProvider};
use crate::search::{SearchApi, SearchClient};
use crate::Result;
use axum::http::StatusCode;
use futures::FutureExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, warn};

pub mod params;
pub mod portfolio;
pub mod travel;

pub use portfolio::{CalculateSharesToSellTool, CheckPortfolioTool};
pub use travel::{GetFlightsTool, GetHotelsTool};

/// Trait for a single agent tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn parameters(&self) -> &'static [ToolParameter];
    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput>;

    /// Body returned when `execute` fails.
    fn failure_body(&self, error: &AgentError) -> Value {
        json!({ "error": error.to_string() })
    }

    fn path(&self) -> String {
        format!("/{}", self.name())
    }
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Registered tools, sorted by name.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.list()
            .into_iter()
            .filter_map(|name| self.get(name))
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one tool run, ready to be placed in any response envelope.
/// `success` is the tool's own verdict: a search the provider rejected
/// completes with status 200 but is not a success.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub status: StatusCode,
    pub success: bool,
    pub error: Option<String>,
    pub body: Value,
}

impl ToolResponse {
    fn failed(error: &AgentError, body: Value) -> Self {
        Self {
            status: error.status_code(),
            success: false,
            error: Some(error.to_string()),
            body,
        }
    }
}

/// Run `name` with `parameters`. Never fails: unknown tools, tool errors and
/// panics all become structured bodies with a matching status.
pub async fn run_tool(registry: &ToolRegistry, name: &str, parameters: Value) -> ToolResponse {
    let Some(tool) = registry.get(name) else {
        warn!(tool_name = %name, "Tool not registered");
        let err = AgentError::ToolNotFound(name.to_string());
        let body = json!({ "error": err.to_string() });
        return ToolResponse::failed(&err, body);
    };

    let input = ToolInput { parameters };

    let result = AssertUnwindSafe(tool.execute(&input)).catch_unwind().await;

    let result = match result {
        Ok(result) => result,
        Err(_) => {
            error!(tool_name = %name, "Tool panicked");
            Err(AgentError::Unknown(format!("{} failed unexpectedly", name)))
        }
    };

    match result {
        Ok(output) => {
            if !output.success {
                warn!(tool_name = %name, error = ?output.error, "Tool reported an unusable result");
            }
            ToolResponse {
                status: StatusCode::OK,
                success: output.success,
                error: output.error,
                body: output.data,
            }
        }
        Err(e) => {
            warn!(tool_name = %name, error = %e, "Tool execution failed");
            ToolResponse::failed(&e, tool.failure_body(&e))
        }
    }
}

/// Registry wired to the given search API and holdings source. Quotes go
/// through the same search API.
pub fn build_registry(
    search: Arc<dyn SearchApi>,
    holdings: Arc<dyn HoldingsSource>,
) -> ToolRegistry {
    let quotes: Arc<dyn QuoteProvider> = Arc::new(SearchQuoteProvider::new(search.clone()));
    build_registry_with_quotes(search, holdings, quotes)
}

pub fn build_registry_with_quotes(
    search: Arc<dyn SearchApi>,
    holdings: Arc<dyn HoldingsSource>,
    quotes: Arc<dyn QuoteProvider>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(GetFlightsTool::new(search.clone())));
    registry.register(Arc::new(GetHotelsTool::new(search)));
    registry.register(Arc::new(CheckPortfolioTool::new(holdings.clone(), quotes.clone())));
    registry.register(Arc::new(CalculateSharesToSellTool::new(holdings, quotes)));

    registry
}

/// Create the default registry with HTTP-backed search tools.
pub fn create_default_registry(config: &AppConfig) -> Result<ToolRegistry> {
    let search: Arc<dyn SearchApi> = Arc::new(SearchClient::from_config(config)?);
    let holdings: Arc<dyn HoldingsSource> = Arc::new(config.holdings_source());
    Ok(build_registry(search, holdings))
}
