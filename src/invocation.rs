//! Agent action-group invocation envelope
//!
//! The agent calls an action group with an event naming the API path and
//! carrying string-typed parameters. The reply wraps the tool body as a JSON
//! string under `responseBody["application/json"].body`.

use crate::tools::{run_tool, ToolRegistry, ToolResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{info, warn};

pub const MESSAGE_VERSION: &str = "1.0";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupEvent {
    #[serde(default)]
    pub message_version: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub action_group: String,
    pub api_path: String,
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub parameters: Vec<EventParameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub session_attributes: HashMap<String, String>,
    #[serde(default)]
    pub prompt_session_attributes: HashMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventParameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: String,
    pub value: String,
}

impl EventParameter {
    /// Convert the string value according to its declared type. Values that
    /// do not parse are passed on as strings for the tool to reject.
    fn typed_value(&self) -> Value {
        let raw = self.value.trim();
        let typed = match self.param_type.as_str() {
            "integer" => raw.parse::<i64>().ok().map(Value::from),
            "number" => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::from),
            "boolean" => raw.parse::<bool>().ok().map(Value::from),
            _ => None,
        };
        typed.unwrap_or_else(|| Value::String(self.value.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestBody {
    #[serde(default)]
    pub content: HashMap<String, RequestContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestContent {
    #[serde(default)]
    pub properties: Vec<EventParameter>,
}

impl ActionGroupEvent {
    /// Tool name addressed by `apiPath`.
    pub fn tool_name(&self) -> &str {
        self.api_path.trim_start_matches('/')
    }

    /// Query parameters and JSON body properties merged into one object.
    /// Query parameters win on conflict.
    pub fn tool_parameters(&self) -> Value {
        let mut params = Map::new();

        if let Some(content) = self
            .request_body
            .as_ref()
            .and_then(|body| body.content.get(JSON_CONTENT_TYPE))
        {
            for property in &content.properties {
                params.insert(property.name.clone(), property.typed_value());
            }
        }

        for parameter in &self.parameters {
            params.insert(parameter.name.clone(), parameter.typed_value());
        }

        Value::Object(params)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupResponse {
    pub message_version: String,
    pub response: ActionResponse,
    pub session_attributes: HashMap<String, String>,
    pub prompt_session_attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    pub http_status_code: u16,
    pub response_body: HashMap<String, ResponseContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseContent {
    /// Tool body serialized as a JSON string.
    pub body: String,
}

impl ActionGroupResponse {
    pub fn new(event: ActionGroupEvent, outcome: ToolResponse) -> Self {
        let mut response_body = HashMap::new();
        response_body.insert(
            JSON_CONTENT_TYPE.to_string(),
            ResponseContent {
                body: outcome.body.to_string(),
            },
        );

        Self {
            message_version: MESSAGE_VERSION.to_string(),
            response: ActionResponse {
                action_group: event.action_group,
                api_path: event.api_path,
                http_method: event.http_method,
                http_status_code: outcome.status.as_u16(),
                response_body,
            },
            session_attributes: event.session_attributes,
            prompt_session_attributes: event.prompt_session_attributes,
        }
    }

    /// Decoded tool body.
    pub fn body(&self) -> Option<Value> {
        self.response
            .response_body
            .get(JSON_CONTENT_TYPE)
            .and_then(|content| serde_json::from_str(&content.body).ok())
    }
}

/// Resolve an action-group event against the registry.
pub async fn handle_event(registry: &ToolRegistry, event: ActionGroupEvent) -> ActionGroupResponse {
    info!(
        action_group = %event.action_group,
        api_path = %event.api_path,
        http_method = %event.http_method,
        session_id = ?event.session_id,
        "Action group invoked"
    );

    let outcome = run_tool(registry, event.tool_name(), event.tool_parameters()).await;

    if !outcome.status.is_success() {
        warn!(
            api_path = %event.api_path,
            status = outcome.status.as_u16(),
            "Action group call did not succeed"
        );
    }

    ActionGroupResponse::new(event, outcome)
}
