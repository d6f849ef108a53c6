pub mod exchange;
pub mod math;
pub mod python;
pub mod registry;
pub mod search;
pub mod weather;
pub mod youtube;

pub use registry::{ToolExecutor, ToolRegistry};

use crate::errors::AgentResult;
use crate::secrets::Secrets;

/// The full built-in tool set, wired to the configured credentials. Absent
/// credentials are fine: the affected tools report unavailability as text
/// when called.
pub fn builtin_registry(secrets: &Secrets) -> AgentResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    registry.register(math::ArithmeticTool::addition())?;
    registry.register(math::ArithmeticTool::multiply())?;
    registry.register(math::ArithmeticTool::subtraction())?;
    registry.register(math::ArithmeticTool::division())?;
    registry.register(weather::WeatherTool::new(
        secrets.openweathermap_api_key.clone(),
    ))?;
    registry.register(search::GoogleSearchTool::new(
        secrets.serper_api_key.clone(),
    ))?;
    registry.register(search::DuckSearchTool::new())?;
    registry.register(youtube::YoutubeSearchTool::new())?;
    registry.register(exchange::ExchangeRateTool::new(
        secrets.exchangerate_api_key.clone(),
    ))?;
    registry.register(python::PythonReplTool::new())?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tool::ToolCall;
    use serde_json::json;

    #[tokio::test]
    async fn test_dispatch_addition() {
        let registry = builtin_registry(&Secrets::default()).unwrap();
        let output = registry
            .dispatch(&ToolCall::new("addition", json!({"a": 2, "b": 3})))
            .await
            .unwrap();
        assert_eq!(output, "5");
    }

    #[tokio::test]
    async fn test_dispatch_division_by_zero_returns_text() {
        let registry = builtin_registry(&Secrets::default()).unwrap();
        let output = registry
            .dispatch(&ToolCall::new("division", json!({"a": 5, "b": 0})))
            .await
            .unwrap();
        assert_eq!(output, "Denominator cannot be zero.");
    }

    #[test]
    fn test_builtin_registry_registers_all_tools() {
        let registry = builtin_registry(&Secrets::default()).unwrap();
        let names: Vec<String> = registry
            .schemas()
            .iter()
            .map(|tool| tool.name.clone())
            .collect();

        assert_eq!(
            names,
            vec![
                "addition",
                "multiply",
                "subtraction",
                "division",
                "get_weather",
                "search_google",
                "search_duck",
                "youtube_search",
                "get_exchange_rate",
                "python_repl",
            ]
        );
    }
}
