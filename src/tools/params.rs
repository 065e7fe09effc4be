//! Parameter extraction for tool inputs
//!
//! Agent events and query strings deliver every value as a string, JSON
//! bodies deliver typed values. Both are accepted.

use crate::error::AgentError;
use crate::models::ToolInput;
use crate::Result;
use serde_json::Value;

pub fn ensure_object_parameters(input: &ToolInput) -> Result<()> {
    if input.parameters.is_object() {
        Ok(())
    } else {
        Err(AgentError::InvalidToolInput(
            "tool_input must be a JSON object".to_string(),
        ))
    }
}

fn raw<'a>(input: &'a ToolInput, name: &str) -> Option<&'a Value> {
    match input.parameters.get(name)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        value => Some(value),
    }
}

pub fn optional_str(input: &ToolInput, name: &str) -> Result<Option<String>> {
    match raw(input, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(AgentError::InvalidToolInput(format!(
            "{} must be a string, got {}",
            name, other
        ))),
    }
}

pub fn require_str(input: &ToolInput, name: &str) -> Result<String> {
    optional_str(input, name)?
        .ok_or_else(|| AgentError::InvalidToolInput(format!("Expected '{}' in tool_input", name)))
}

pub fn optional_f64(input: &ToolInput, name: &str) -> Result<Option<f64>> {
    let parsed = match raw(input, name) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| AgentError::InvalidToolInput(format!("{} must be a number", name)))
}

pub fn require_f64(input: &ToolInput, name: &str) -> Result<f64> {
    optional_f64(input, name)?
        .ok_or_else(|| AgentError::InvalidToolInput(format!("Expected '{}' in tool_input", name)))
}

pub fn optional_u32(input: &ToolInput, name: &str) -> Result<Option<u32>> {
    let parsed = match raw(input, name) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    };

    parsed.map(Some).ok_or_else(|| {
        AgentError::InvalidToolInput(format!("{} must be a non-negative integer", name))
    })
}
