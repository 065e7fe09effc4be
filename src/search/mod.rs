//! Search API access
//!
//! All three lookups (flights, hotels, quotes) go through one hosted search
//! API that selects its backend with an `engine` parameter. Responses are
//! classified into a `SearchOutcome` instead of being checked ad hoc.

use crate::config::AppConfig;
use crate::error::AgentError;
use crate::Result;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEngine {
    GoogleFlights,
    GoogleHotels,
    GoogleFinance,
}

impl SearchEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::GoogleFlights => "google_flights",
            SearchEngine::GoogleHotels => "google_hotels",
            SearchEngine::GoogleFinance => "google_finance",
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One search call. The API key is added by the client and never stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub engine: SearchEngine,
    pub params: Vec<(&'static str, String)>,
}

impl SearchRequest {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for the hosted search API
#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    /// Run a search and return the raw JSON body. Provider-level errors
    /// reported inside the body are returned as `Ok`.
    async fn search(&self, request: &SearchRequest) -> Result<Value>;
}

/// Classified search response.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    Success(T),
    ProviderError(String),
    Empty,
}

impl<T> SearchOutcome<T> {
    pub fn from_response(body: &Value, extract: impl FnOnce(&Value) -> Option<T>) -> Self {
        if let Some(message) = provider_error(body) {
            return SearchOutcome::ProviderError(message);
        }

        match extract(body) {
            Some(data) => SearchOutcome::Success(data),
            None => SearchOutcome::Empty,
        }
    }
}

fn provider_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) if message.trim().is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a price that may be a JSON number or a string such as "$1,234.50".
pub fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };

    price.is_finite().then_some(price)
}

/// HTTP client for the hosted search API (connection-pooled)
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.search_api_base_url.clone(),
            config.search_api_key.clone(),
            config.search_timeout,
        )
    }
}

#[async_trait::async_trait]
impl SearchApi for SearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        if self.api_key.is_empty() {
            return Err(AgentError::Configuration(
                "API_KEY for the search API is not configured".to_string(),
            ));
        }

        debug!(engine = %request.engine, params = ?request.params, "Calling search API");

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(request.params.len() + 2);
        query.push(("engine", request.engine.as_str()));
        query.extend(request.params.iter().map(|(k, v)| (*k, v.as_str())));
        query.push(("api_key", self.api_key.as_str()));

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                error!(engine = %request.engine, error = %e, "Search API request failed");
                AgentError::SearchApi(format!("{} request failed: {}", request.engine, e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AgentError::SearchApi(format!("{} response unreadable: {}", request.engine, e))
        })?;

        match serde_json::from_str::<Value>(&text) {
            // Error bodies are handed back so callers can classify them.
            Ok(body) if status.is_success() || provider_error(&body).is_some() => Ok(body),
            Ok(body) => Err(AgentError::SearchApi(format!(
                "{} returned {}: {}",
                request.engine, status, body
            ))),
            Err(e) => {
                error!(engine = %request.engine, %status, "Search API returned invalid JSON");
                Err(AgentError::SearchApi(format!(
                    "{} returned invalid JSON ({}): {}",
                    request.engine, status, e
                )))
            }
        }
    }
}

/// Canned responses keyed by engine and optionally by the `q` parameter.
/// Used by tests and offline runs; records every request it receives.
#[derive(Default)]
pub struct StaticSearchApi {
    responses: HashMap<(SearchEngine, Option<String>), Value>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StaticSearchApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, engine: SearchEngine, body: Value) -> Self {
        self.responses.insert((engine, None), body);
        self
    }

    pub fn with_query_response(mut self, engine: SearchEngine, q: &str, body: Value) -> Self {
        self.responses.insert((engine, Some(q.to_string())), body);
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl SearchApi for StaticSearchApi {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let q = request.get("q").map(str::to_string);
        self.responses
            .get(&(request.engine, q))
            .or_else(|| self.responses.get(&(request.engine, None)))
            .cloned()
            .ok_or_else(|| {
                AgentError::SearchApi(format!("no canned response for {}", request.engine))
            })
    }
}
