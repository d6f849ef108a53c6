//! End-to-end run of the orchestration loop over the built-in tool set,
//! with the reasoning backend scripted the way a real planning session
//! unfolds: weather, search, arithmetic, then a final itinerary.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

use wayfarer::agent::Agent;
use wayfarer::errors::AgentError;
use wayfarer::models::message::{Message, MessageContent, Role};
use wayfarer::models::tool::{Tool, ToolCall};
use wayfarer::providers::base::{Provider, Usage};
use wayfarer::reasoner::Reasoner;
use wayfarer::secrets::Secrets;
use wayfarer::tools::builtin_registry;

/// Replays a scripted sequence of assistant messages.
struct ScriptedBackend {
    responses: Mutex<Vec<Message>>,
}

impl ScriptedBackend {
    fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl Provider for ScriptedBackend {
    async fn complete(
        &self,
        _system: &str,
        _messages: &[Message],
        _tools: &[Tool],
    ) -> Result<(Message, Usage)> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok((Message::assistant().with_text(""), Usage::default()))
        } else {
            Ok((responses.remove(0), Usage::default()))
        }
    }
}

fn scripted_agent(responses: Vec<Message>) -> Agent {
    let registry = builtin_registry(&Secrets::default()).unwrap();
    Agent::new(
        Reasoner::with_provider(Box::new(ScriptedBackend::new(responses))),
        registry,
    )
}

#[tokio::test]
async fn test_multi_round_plan_over_builtin_tools() {
    // Round 1: weather (no credential configured, so the tool reports that
    // as text and the plan continues). Round 2: cost arithmetic. Round 3:
    // the final itinerary.
    let agent = scripted_agent(vec![
        Message::assistant()
            .with_tool_request("w1", Ok(ToolCall::new("get_weather", json!({"city": "Goa"})))),
        Message::assistant()
            .with_tool_request("m1", Ok(ToolCall::new("multiply", json!({"a": 3000, "b": 5}))))
            .with_tool_request("m2", Ok(ToolCall::new("addition", json!({"a": 15000, "b": 2500})))),
        Message::assistant().with_text("## Summary\nTotal trip cost: 17500 INR"),
    ]);

    let mut conversation = vec![Message::user().with_text("Plan 5 days in Goa")];
    let answer = agent.reply(&mut conversation).await.unwrap();

    assert!(answer.contains("17500 INR"));

    // user + (assistant, tool results) * 2 + final assistant
    assert_eq!(conversation.len(), 6);
    assert_eq!(conversation[5].role, Role::Assistant);

    // Weather ran without a credential and still produced a text result
    let weather = conversation[2].content[0].as_tool_response().unwrap();
    assert_eq!(weather.id, "w1");
    assert!(weather.output.contains("Weather API key not available"));

    // Arithmetic results are paired to their requests in issue order
    let costs: Vec<_> = conversation[4]
        .content
        .iter()
        .filter_map(MessageContent::as_tool_response)
        .collect();
    assert_eq!(costs.len(), 2);
    assert_eq!(costs[0].id, "m1");
    assert_eq!(costs[0].output, "15000");
    assert_eq!(costs[1].id, "m2");
    assert_eq!(costs[1].output, "17500");
}

#[tokio::test]
async fn test_tool_failure_still_produces_a_plan() {
    // division by zero is a tool-local failure: the loop keeps going and the
    // backend gets to see the error text and recover.
    let agent = scripted_agent(vec![
        Message::assistant()
            .with_tool_request("d1", Ok(ToolCall::new("division", json!({"a": 5, "b": 0})))),
        Message::assistant().with_text("I could not compute the per-day cost."),
    ]);

    let mut conversation = vec![Message::user().with_text("Divide my budget")];
    let answer = agent.reply(&mut conversation).await.unwrap();

    assert_eq!(answer, "I could not compute the per-day cost.");
    let response = conversation[2].content[0].as_tool_response().unwrap();
    assert_eq!(response.output, "Denominator cannot be zero.");
}

#[tokio::test]
async fn test_loop_terminates_within_round_cap() {
    let endless: Vec<Message> = (0..10)
        .map(|i| {
            Message::assistant().with_tool_request(
                format!("c{i}"),
                Ok(ToolCall::new("addition", json!({"a": 1, "b": 1}))),
            )
        })
        .collect();

    let agent = scripted_agent(endless).with_max_rounds(4);

    let result = agent.ask("Keep adding").await;
    assert!(matches!(
        result.err(),
        Some(AgentError::MaxRoundsExceeded(4))
    ));
}
