//! Error types for the travel planner agent tools

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {

    // =============================
    // Domain Errors
    // =============================

    #[error("{0}")]
    Configuration(String),

    #[error("Insufficient portfolio value ({total_value}) to meet target amount ({target_amount})")]
    InsufficientValue { total_value: f64, target_amount: f64 },

    // =============================
    // Tool Pipeline Errors
    // =============================

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Search API error: {0}")]
    SearchApi(String),

    #[error("Unknown error: {0}")]
    Unknown(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl AgentError {
    /// HTTP status reported to the agent for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AgentError::Configuration(_) | AgentError::InvalidToolInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AgentError::ToolNotFound(_) => StatusCode::NOT_FOUND,
            AgentError::InsufficientValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AgentError::SearchApi(_) | AgentError::HttpError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
