//! The tool-orchestration loop.
//!
//! One invocation owns one conversation: ask the reasoner what to do next,
//! execute whichever tool calls it requested, fold the results back in, and
//! repeat until the backend answers without requesting tools. The loop is
//! strictly sequential: ordering is a stronger guarantee than throughput
//! here, since the backend's narrative assumes the order it issued.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::prompt::SYSTEM_PROMPT;
use crate::reasoner::{Decision, Reasoner};
use crate::settings::DEFAULT_MAX_ROUNDS;
use crate::tools::ToolRegistry;

pub struct Agent {
    reasoner: Reasoner,
    registry: ToolRegistry,
    system: String,
    max_rounds: usize,
    cancel: CancellationToken,
}

impl Agent {
    pub fn new(reasoner: Reasoner, registry: ToolRegistry) -> Self {
        Self {
            reasoner,
            registry,
            system: SYSTEM_PROMPT.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Handle for external cancellation. Cancelling aborts the loop at its
    /// next suspension point with `AgentError::Cancelled`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Install a fresh token after a cancellation so the agent is usable for
    /// the next query.
    pub fn reset_cancellation(&mut self) {
        self.cancel = CancellationToken::new();
    }

    /// Run one query against a fresh conversation and return the final answer.
    pub async fn ask(&self, question: &str) -> AgentResult<String> {
        let mut conversation = vec![Message::user().with_text(question)];
        self.reply(&mut conversation).await
    }

    /// Drive the conversation until the backend produces an answer requiring
    /// no further tool use. The caller owns the conversation; it is appended
    /// to in place so the full transcript is available afterwards.
    pub async fn reply(&self, conversation: &mut Vec<Message>) -> AgentResult<String> {
        let tools = self.registry.schemas();

        for round in 0..self.max_rounds {
            let decision = tokio::select! {
                _ = self.cancel.cancelled() => return Err(AgentError::Cancelled),
                decision = self.reasoner.decide(&self.system, conversation.as_slice(), &tools) => decision?,
            };

            match decision {
                Decision::Final(message) => {
                    let answer = message.text();
                    conversation.push(message);
                    debug!(rounds = round + 1, "conversation complete");
                    return Ok(answer);
                }
                Decision::ToolUse(message, requests) => {
                    conversation.push(message);

                    // Resolve every request, in the order issued, before the
                    // next decision round. Tools never see each other's
                    // output within the same round.
                    let mut results = Message::user();
                    for request in requests {
                        let call = request.call?;
                        let output = tokio::select! {
                            _ = self.cancel.cancelled() => return Err(AgentError::Cancelled),
                            output = self.registry.dispatch(&call) => output?,
                        };
                        results = results.with_tool_response(&request.id, output);
                    }
                    conversation.push(results);
                }
            }
        }

        warn!(max_rounds = self.max_rounds, "loop did not terminate");
        Err(AgentError::MaxRoundsExceeded(self.max_rounds))
    }
}
