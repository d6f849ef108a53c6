use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural failures that terminate the orchestration loop. Tool-internal
/// failures never appear here: every tool converts them to a text result at
/// its own boundary, so the model sees them as conversation content instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    #[error("Reasoning backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Exceeded the maximum of {0} decision rounds")]
    MaxRoundsExceeded(usize),

    #[error("Cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
