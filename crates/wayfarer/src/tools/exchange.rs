//! Currency conversion against ExchangeRate-API. Two variants: the free
//! endpoint when no credential is configured, the keyed v6 endpoint
//! otherwise. Every failure mode becomes a distinct text result.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::registry::ToolExecutor;
use crate::models::tool::Tool;

pub const EXCHANGERATE_FREE_HOST: &str = "https://api.exchangerate-api.com";
pub const EXCHANGERATE_KEYED_HOST: &str = "https://v6.exchangerate-api.com";

/// Reference amount used for the illustrative conversion in keyed responses.
const EXAMPLE_AMOUNT: f64 = 100.0;

pub struct ExchangeRateTool {
    api_key: Option<String>,
    free_host: String,
    keyed_host: String,
    client: Client,
    timeout: Duration,
}

impl ExchangeRateTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            free_host: EXCHANGERATE_FREE_HOST.to_string(),
            keyed_host: EXCHANGERATE_KEYED_HOST.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_hosts(
        mut self,
        free_host: impl Into<String>,
        keyed_host: impl Into<String>,
    ) -> Self {
        self.free_host = free_host.into();
        self.keyed_host = keyed_host.into();
        self
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, String> {
        self.client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "Request timed out. Please try again later.".to_string()
                } else {
                    format!("Network error fetching exchange rate: {e}")
                }
            })
    }

    async fn free_tier(&self, from: &str, to: &str) -> String {
        let url = format!(
            "{}/v4/latest/{}",
            self.free_host.trim_end_matches('/'),
            from
        );

        let response = match self.get(&url).await {
            Ok(response) => response,
            Err(text) => return text,
        };
        if !response.status().is_success() {
            return "Unable to fetch exchange rate. Please try again later.".to_string();
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                return format!(
                    "Error fetching exchange rate: {e}. Please try using search_google or \
                     search_duck as fallback."
                )
            }
        };

        match data["rates"][to].as_f64() {
            Some(rate) => {
                let date = data["date"].as_str().unwrap_or("today");
                format!("Current exchange rate: 1 {from} = {rate:.4} {to} (as of {date})")
            }
            None => format!("Currency {to} not found in exchange rates."),
        }
    }

    async fn keyed(&self, api_key: &str, from: &str, to: &str) -> String {
        let url = format!(
            "{}/v6/{}/latest/{}",
            self.keyed_host.trim_end_matches('/'),
            api_key,
            from
        );

        let response = match self.get(&url).await {
            Ok(response) => response,
            Err(text) => return text,
        };
        if !response.status().is_success() {
            return format!(
                "Unable to fetch exchange rate. Status code: {}. Please check your API key.",
                response.status().as_u16()
            );
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                return format!(
                    "Error fetching exchange rate: {e}. Please try using search_google or \
                     search_duck as fallback."
                )
            }
        };

        if data["result"].as_str() != Some("success") {
            let error_type = data["error-type"].as_str().unwrap_or("Unknown error");
            return format!("API returned error: {error_type}");
        }

        match data["conversion_rates"][to].as_f64() {
            Some(rate) => {
                let last_update = data["time_last_update_utc"].as_str().unwrap_or("recent");
                let converted = rate * EXAMPLE_AMOUNT;
                format!(
                    "Current exchange rate: 1 {from} = {rate:.4} {to} (last updated: \
                     {last_update}). Example: {EXAMPLE_AMOUNT:.0} {from} = {converted:.2} {to}"
                )
            }
            None => format!(
                "Currency {to} not found. Available currencies include: USD, EUR, GBP, INR, \
                 JPY, AUD, CAD, and many more."
            ),
        }
    }
}

#[async_trait]
impl ToolExecutor for ExchangeRateTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_exchange_rate",
            "Get the current exchange rate between two currencies, e.g. \
             get_exchange_rate(\"INR\", \"USD\").",
            json!({
                "type": "object",
                "properties": {
                    "from_currency": {
                        "type": "string",
                        "description": "Source currency code, e.g. 'INR', 'USD', 'EUR'"
                    },
                    "to_currency": {
                        "type": "string",
                        "description": "Target currency code, e.g. 'USD', 'INR', 'GBP'"
                    }
                },
                "required": ["from_currency", "to_currency"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let from = args["from_currency"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_uppercase();
        let to = args["to_currency"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_uppercase();

        match self.api_key.as_deref() {
            Some(api_key) => self.keyed(api_key, &from, &to).await,
            None => self.free_tier(&from, &to).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_free_tier_formats_rate_and_date() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/INR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rates": {"USD": 0.012},
                "date": "2024-01-01"
            })))
            .mount(&mock_server)
            .await;

        let tool = ExchangeRateTool::new(None).with_hosts(mock_server.uri(), "http://127.0.0.1:9");
        let output = tool
            .run(json!({"from_currency": "inr ", "to_currency": " usd"}))
            .await;

        assert!(output.contains("1 INR = 0.0120 USD"));
        assert!(output.contains("2024-01-01"));
    }

    #[tokio::test]
    async fn test_free_tier_unknown_currency() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rates": {"EUR": 0.92},
                "date": "2024-01-01"
            })))
            .mount(&mock_server)
            .await;

        let tool = ExchangeRateTool::new(None).with_hosts(mock_server.uri(), "http://127.0.0.1:9");
        let output = tool
            .run(json!({"from_currency": "USD", "to_currency": "XYZ"}))
            .await;

        assert_eq!(output, "Currency XYZ not found in exchange rates.");
    }

    #[tokio::test]
    async fn test_free_tier_upstream_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let tool = ExchangeRateTool::new(None).with_hosts(mock_server.uri(), "http://127.0.0.1:9");
        let output = tool
            .run(json!({"from_currency": "USD", "to_currency": "INR"}))
            .await;

        assert_eq!(
            output,
            "Unable to fetch exchange rate. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_keyed_reports_rate_and_example_conversion() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/test-key/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "conversion_rates": {"INR": 83.1234},
                "time_last_update_utc": "Mon, 01 Jan 2024 00:00:01 +0000"
            })))
            .mount(&mock_server)
            .await;

        let tool = ExchangeRateTool::new(Some("test-key".to_string()))
            .with_hosts("http://127.0.0.1:9", mock_server.uri());
        let output = tool
            .run(json!({"from_currency": "USD", "to_currency": "INR"}))
            .await;

        assert!(output.contains("1 USD = 83.1234 INR"));
        assert!(output.contains("Example: 100 USD = 8312.34 INR"));
        assert!(output.contains("Mon, 01 Jan 2024"));
    }

    #[tokio::test]
    async fn test_keyed_unknown_currency() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/test-key/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "conversion_rates": {"INR": 83.1},
                "time_last_update_utc": "recent"
            })))
            .mount(&mock_server)
            .await;

        let tool = ExchangeRateTool::new(Some("test-key".to_string()))
            .with_hosts("http://127.0.0.1:9", mock_server.uri());
        let output = tool
            .run(json!({"from_currency": "USD", "to_currency": "XYZ"}))
            .await;

        assert!(output.contains("Currency XYZ not found"));
    }

    #[tokio::test]
    async fn test_keyed_provider_error_code_surfaces() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/test-key/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "error",
                "error-type": "invalid-key"
            })))
            .mount(&mock_server)
            .await;

        let tool = ExchangeRateTool::new(Some("test-key".to_string()))
            .with_hosts("http://127.0.0.1:9", mock_server.uri());
        let output = tool
            .run(json!({"from_currency": "USD", "to_currency": "INR"}))
            .await;

        assert_eq!(output, "API returned error: invalid-key");
    }

    #[tokio::test]
    async fn test_keyed_timeout_is_distinct_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/test-key/latest/USD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": "success"}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let mut tool = ExchangeRateTool::new(Some("test-key".to_string()))
            .with_hosts("http://127.0.0.1:9", mock_server.uri());
        tool.timeout = Duration::from_millis(100);
        let output = tool
            .run(json!({"from_currency": "USD", "to_currency": "INR"}))
            .await;

        assert_eq!(output, "Request timed out. Please try again later.");
    }
}
