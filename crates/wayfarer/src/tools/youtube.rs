use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::registry::ToolExecutor;
use crate::models::tool::Tool;

pub const YOUTUBE_HOST: &str = "https://www.youtube.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_VIDEOS: usize = 3;

/// Travel-video lookup against the YouTube results page. No credential; the
/// video ids are lifted straight out of the embedded `ytInitialData` JSON.
pub struct YoutubeSearchTool {
    host: String,
    client: Client,
    video_id: Regex,
}

impl YoutubeSearchTool {
    pub fn new() -> Self {
        Self {
            host: YOUTUBE_HOST.to_string(),
            client: Client::new(),
            video_id: Regex::new(r#""videoId":"([A-Za-z0-9_-]{11})""#).unwrap(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    async fn search(&self, query: &str) -> Result<String, String> {
        let url = format!(
            "{}/results?search_query={}",
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
        let links = self.extract_watch_links(&html);
        if links.is_empty() {
            Ok(format!("No videos found for: {query}"))
        } else {
            Ok(links.join("\n"))
        }
    }

    /// First few distinct watch links, in page order.
    fn extract_watch_links(&self, html: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for capture in self.video_id.captures_iter(html) {
            let id = capture[1].to_string();
            if !seen.contains(&id) {
                seen.push(id);
                if seen.len() == MAX_VIDEOS {
                    break;
                }
            }
        }
        seen.into_iter()
            .map(|id| format!("https://www.youtube.com/watch?v={id}"))
            .collect()
    }
}

impl Default for YoutubeSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for YoutubeSearchTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "youtube_search",
            "Fetches YouTube videos about travel destinations.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query, e.g. 'Goa travel guide'"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let query = args["query"].as_str().unwrap_or_default();
        match self.search(query).await {
            Ok(links) => links,
            Err(e) => format!("YouTube search unavailable. Error: {e}"),
        }
    }
}
