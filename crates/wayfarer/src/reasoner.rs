//! Adapter between the orchestration loop and the reasoning backend.
//!
//! The loop never talks to a provider directly: it asks the reasoner for a
//! decision and gets back either a final answer or the set of tool requests
//! the backend wants resolved. Exactly one backend is active at a time;
//! switching drops the provider and a new `initialize` must succeed before
//! the next decision.

use tracing::debug;

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::Tool;
use crate::providers::base::Provider;
use crate::providers::configs::ProviderConfig;
use crate::providers::factory;

/// What the backend decided to do with the conversation so far.
pub enum Decision {
    /// A final answer that requests no further tool use.
    Final(Message),
    /// The assistant message carrying one or more tool requests, plus the
    /// requests themselves in the order issued.
    ToolUse(Message, Vec<ToolRequest>),
}

#[derive(Default)]
pub struct Reasoner {
    provider: Option<Box<dyn Provider + Send + Sync>>,
}

impl Reasoner {
    /// A reasoner with no active backend; `initialize` must be called before
    /// the first decision.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reasoner over an already-constructed provider (used by tests).
    pub fn with_provider(provider: Box<dyn Provider + Send + Sync>) -> Self {
        let mut reasoner = Self::new();
        reasoner.install(provider);
        reasoner
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    fn install(&mut self, provider: Box<dyn Provider + Send + Sync>) {
        self.provider = Some(provider);
    }

    /// Build and preflight the configured backend. On failure the reasoner
    /// stays uninitialized so the caller can fix its configuration and retry.
    pub async fn initialize(&mut self, config: ProviderConfig) -> AgentResult<()> {
        let provider = factory::connect(config).await?;
        self.install(provider);
        Ok(())
    }

    /// Drop the active backend. Any state it held is gone; `initialize` must
    /// succeed again before the next `decide`.
    pub fn switch_backend(&mut self) {
        self.provider = None;
    }

    pub async fn decide(
        &self,
        system: &str,
        conversation: &[Message],
        tools: &[Tool],
    ) -> AgentResult<Decision> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            AgentError::BackendUnavailable("no reasoning backend initialized".to_string())
        })?;

        let (message, usage) = provider
            .complete(system, conversation, tools)
            .await
            .map_err(|e| AgentError::BackendUnavailable(e.to_string()))?;

        let requests: Vec<ToolRequest> = message
            .tool_requests()
            .into_iter()
            .cloned()
            .collect();

        debug!(
            requested_tools = requests.len(),
            total_tokens = usage.total_tokens,
            "decision round complete"
        );

        if requests.is_empty() {
            Ok(Decision::Final(message))
        } else {
            Ok(Decision::ToolUse(message, requests))
        }
    }
}
