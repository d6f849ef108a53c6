//! Web search tools: Serper as the credentialed primary, DuckDuckGo HTML as
//! the credential-free fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::warn;

use super::registry::ToolExecutor;
use crate::models::tool::Tool;

pub const SERPER_HOST: &str = "https://google.serper.dev";
pub const DUCKDUCKGO_HOST: &str = "https://html.duckduckgo.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESULTS: usize = 5;

/// DuckDuckGo HTML search. No credential, rate-limited, good enough as a
/// fallback data source.
pub struct DuckSearchTool {
    host: String,
    client: Client,
}

impl DuckSearchTool {
    pub fn new() -> Self {
        Self {
            host: DUCKDUCKGO_HOST.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    async fn search(&self, query: &str) -> Result<String, String> {
        let url = format!(
            "{}/html/?q={}",
            self.host.trim_end_matches('/'),
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "Mozilla/5.0 (compatible; Wayfarer/0.1)")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let html = response.text().await.map_err(|e| e.to_string())?;
        let results = extract_duck_results(&html);
        if results.is_empty() {
            Ok(format!("No results found for: {query}"))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

impl Default for DuckSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for DuckSearchTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "search_duck",
            "Fetches details using DuckDuckGo search.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let query = args["query"].as_str().unwrap_or_default();
        match self.search(query).await {
            Ok(results) => results,
            Err(e) => format!("Search unavailable. Error: {e}"),
        }
    }
}

/// Serper web search for attractions, hotels, restaurants and prices. Any
/// failure of the primary (transport error, non-2xx, missing credential)
/// falls through to DuckDuckGo with the identical query, attempted once.
pub struct GoogleSearchTool {
    api_key: Option<String>,
    host: String,
    client: Client,
    fallback: DuckSearchTool,
}

impl GoogleSearchTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            host: SERPER_HOST.to_string(),
            client: Client::new(),
            fallback: DuckSearchTool::new(),
        }
    }

    pub fn with_hosts(
        mut self,
        serper_host: impl Into<String>,
        duck_host: impl Into<String>,
    ) -> Self {
        self.host = serper_host.into();
        self.fallback = DuckSearchTool::new().with_host(duck_host);
        self
    }

    async fn search_serper(&self, query: &str) -> Result<String, String> {
        let api_key = self.api_key.as_deref().ok_or("SERPER_API_KEY not configured")?;

        let url = format!("{}/search", self.host.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&json!({ "q": query }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let data: Value = response.json().await.map_err(|e| e.to_string())?;
        let mut results = Vec::new();

        if let Some(answer) = data["answerBox"]["answer"]
            .as_str()
            .or_else(|| data["answerBox"]["snippet"].as_str())
        {
            results.push(answer.to_string());
        }

        if let Some(organic) = data["organic"].as_array() {
            for entry in organic.iter().take(MAX_RESULTS) {
                let title = entry["title"].as_str().unwrap_or("No title");
                let snippet = entry["snippet"].as_str().unwrap_or("");
                let link = entry["link"].as_str().unwrap_or("");
                results.push(format!("**{title}**\n{snippet}\nURL: {link}"));
            }
        }

        if results.is_empty() {
            return Err("empty result set".to_string());
        }
        Ok(results.join("\n\n"))
    }
}

#[async_trait]
impl ToolExecutor for GoogleSearchTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "search_google",
            "Fetches details about attractions, restaurants, hotels, etc. from Google search.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let query = args["query"].as_str().unwrap_or_default();
        match self.search_serper(query).await {
            Ok(results) => results,
            Err(reason) => {
                warn!(%reason, "primary search failed, falling through to DuckDuckGo");
                self.fallback.run(args.clone()).await
            }
        }
    }
}

/// Extract titles, snippets and URLs from a DuckDuckGo HTML result page.
fn extract_duck_results(html: &str) -> Vec<String> {
    let mut results = Vec::new();

    for (i, chunk) in html.split("class=\"result__body\"").enumerate().skip(1) {
        if i > MAX_RESULTS {
            break;
        }

        let title = chunk
            .split("class=\"result__a\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("No title");

        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("No snippet");

        let url = chunk
            .split("class=\"result__url\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .map(|s| s.trim())
            .unwrap_or("");

        if !title.is_empty() && title != "No title" {
            results.push(format!(
                "**{}**\n{}\nURL: {}",
                html_decode(title),
                html_decode(snippet),
                url
            ));
        }
    }

    results
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DUCK_PAGE: &str = r##"
        <div class="result__body">
            <a class="result__a" href="#">Top beaches in Goa</a>
            <a class="result__snippet" href="#">Baga and Palolem lead the list.</a>
            <span class="result__url"> goa-guide.example </span>
        </div>
    "##;

    #[tokio::test]
    async fn test_duck_extracts_results() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DUCK_PAGE))
            .mount(&mock_server)
            .await;

        let tool = DuckSearchTool::new().with_host(mock_server.uri());
        let output = tool.run(json!({"query": "Goa beaches"})).await;

        assert!(output.contains("Top beaches in Goa"));
        assert!(output.contains("Baga and Palolem"));
    }

    #[tokio::test]
    async fn test_duck_failure_is_text() {
        let tool = DuckSearchTool::new().with_host("http://127.0.0.1:9");
        let output = tool.run(json!({"query": "Goa beaches"})).await;
        assert!(output.starts_with("Search unavailable."));
    }

    #[tokio::test]
    async fn test_serper_results_reach_conversation() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [
                    {"title": "Goa hotels", "snippet": "Under 3000 INR per night", "link": "https://hotels.example"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let tool = GoogleSearchTool::new(Some("key".to_string()))
            .with_hosts(mock_server.uri(), "http://127.0.0.1:9");
        let output = tool.run(json!({"query": "Goa hotels"})).await;

        assert!(output.contains("Goa hotels"));
        assert!(output.contains("Under 3000 INR"));
    }

    #[tokio::test]
    async fn test_primary_failure_falls_through_with_identical_query() {
        let serper = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&serper)
            .await;

        let duck = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "Goa water sports"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DUCK_PAGE))
            .expect(1)
            .mount(&duck)
            .await;

        let tool = GoogleSearchTool::new(Some("key".to_string()))
            .with_hosts(serper.uri(), duck.uri());
        let output = tool.run(json!({"query": "Goa water sports"})).await;

        // The duck result is what reaches the conversation
        assert!(output.contains("Top beaches in Goa"));
    }

    #[tokio::test]
    async fn test_missing_credential_falls_through() {
        let duck = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "Goa nightlife"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DUCK_PAGE))
            .expect(1)
            .mount(&duck)
            .await;

        let tool = GoogleSearchTool::new(None).with_hosts("http://127.0.0.1:9", duck.uri());
        let output = tool.run(json!({"query": "Goa nightlife"})).await;

        assert!(output.contains("Top beaches in Goa"));
    }
}
