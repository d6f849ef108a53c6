//! Name-to-implementation registry for the tool set.
//!
//! Registered once at startup and read-only afterwards. `dispatch` enforces
//! the registry-level contract (known tool, required arguments present and
//! type-compatible); everything past that boundary is the tool's own
//! responsibility and always comes back as text.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};

/// A callable tool: descriptor for the model, executable body for the loop.
/// `run` must not fail; implementations convert every internal failure
/// (network, credential, bad payload) into a descriptive text result.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    fn descriptor(&self) -> Tool;

    async fn run(&self, args: Value) -> String;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(Tool, Arc<dyn ToolExecutor>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, executor: impl ToolExecutor + 'static) -> AgentResult<()> {
        let tool = executor.descriptor();
        if self.tools.iter().any(|(t, _)| t.name == tool.name) {
            return Err(AgentError::DuplicateTool(tool.name));
        }
        self.tools.push((tool, Arc::new(executor)));
        Ok(())
    }

    /// Descriptors of every registered tool, in registration order.
    pub fn schemas(&self) -> Vec<Tool> {
        self.tools.iter().map(|(tool, _)| tool.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn dispatch(&self, call: &ToolCall) -> AgentResult<String> {
        let (tool, executor) = self
            .tools
            .iter()
            .find(|(tool, _)| tool.name == call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        validate_arguments(tool, &call.arguments)?;

        debug!(tool = %call.name, "dispatching tool call");
        Ok(executor.run(call.arguments.clone()).await)
    }
}

/// Check the declared required arguments against what the backend sent.
/// Only `string` / `number` / `integer` / `boolean` declarations are
/// type-checked; anything else is left to the tool.
fn validate_arguments(tool: &Tool, args: &Value) -> AgentResult<()> {
    let required = tool.input_schema["required"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    if required.is_empty() {
        return Ok(());
    }

    let arg_map = args.as_object().ok_or_else(|| {
        AgentError::InvalidParameters(format!("{}: arguments must be an object", tool.name))
    })?;

    for name in required.iter().filter_map(|v| v.as_str()) {
        let value = arg_map.get(name).ok_or_else(|| {
            AgentError::InvalidParameters(format!(
                "{}: missing required argument '{}'",
                tool.name, name
            ))
        })?;

        let declared = tool.input_schema["properties"][name]["type"].as_str();
        let compatible = match declared {
            Some("string") => value.is_string(),
            Some("number") => value.is_number(),
            Some("integer") => value.is_i64() || value.is_u64(),
            Some("boolean") => value.is_boolean(),
            _ => true,
        };
        if !compatible {
            return Err(AgentError::InvalidParameters(format!(
                "{}: argument '{}' should be a {}",
                tool.name,
                name,
                declared.unwrap_or("value")
            )));
        }
    }

    Ok(())
}
