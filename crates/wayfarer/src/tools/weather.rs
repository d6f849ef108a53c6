use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::registry::ToolExecutor;
use crate::models::tool::Tool;

pub const OPENWEATHERMAP_HOST: &str = "https://api.openweathermap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current conditions from OpenWeatherMap, keyed by city name.
pub struct WeatherTool {
    api_key: Option<String>,
    host: String,
    client: Client,
}

impl WeatherTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            host: OPENWEATHERMAP_HOST.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    async fn fetch(&self, city: &str, api_key: &str) -> Result<String, String> {
        let url = format!(
            "{}/data/2.5/weather?q={}&appid={}&units=metric",
            self.host.trim_end_matches('/'),
            urlencoding::encode(city),
            api_key
        );

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let data: Value = response.json().await.map_err(|e| e.to_string())?;
        let description = data["weather"][0]["description"]
            .as_str()
            .unwrap_or("unknown conditions");
        let temp = data["main"]["temp"].as_f64().unwrap_or(f64::NAN);
        let feels_like = data["main"]["feels_like"].as_f64().unwrap_or(temp);
        let humidity = data["main"]["humidity"].as_f64().unwrap_or(f64::NAN);
        let wind = data["wind"]["speed"].as_f64().unwrap_or(f64::NAN);

        Ok(format!(
            "In {city}, the current weather is {description}, temperature {temp:.1}\u{b0}C \
             (feels like {feels_like:.1}\u{b0}C), humidity {humidity:.0}%, wind {wind:.1} m/s."
        ))
    }
}

#[async_trait]
impl ToolExecutor for WeatherTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_weather",
            "Fetches the current weather of the city from OpenWeatherMap.",
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city to check, e.g. Goa"
                    }
                },
                "required": ["city"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let city = args["city"].as_str().unwrap_or_default().to_string();

        let Some(api_key) = self.api_key.as_deref() else {
            return format!("Weather API key not available. Cannot get weather for {city}.");
        };

        match self.fetch(&city, api_key).await {
            Ok(report) => report,
            Err(e) => format!("Weather data unavailable for {city}. Error: {e}"),
        }
    }
}
