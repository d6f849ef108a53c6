use crate::providers::configs::{OllamaProviderConfig, OpenAiProviderConfig, ProviderConfig};
use crate::providers::factory::ProviderType;
use crate::providers::ollama::{OLLAMA_HOST, OLLAMA_MODEL};
use crate::providers::openai::{OPENAI_HOST, OPENAI_MODEL};
use crate::secrets::Secrets;

/// Default cap on decision rounds before the loop gives up.
pub const DEFAULT_MAX_ROUNDS: usize = 15;

/// Run configuration resolved by the caller (CLI flags, environment) and
/// consumed read-only by the core.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderType,
    /// Model override; each backend has its own default.
    pub model: Option<String>,
    /// Where a locally-hosted backend listens.
    pub ollama_host: String,
    pub max_rounds: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderType::OpenAi,
            model: None,
            ollama_host: OLLAMA_HOST.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl Settings {
    /// The provider configuration this run should initialize the reasoner
    /// with. Temperature is pinned to 0 for reproducible planning.
    pub fn provider_config(&self, secrets: &Secrets) -> ProviderConfig {
        match self.provider {
            ProviderType::OpenAi => ProviderConfig::OpenAi(OpenAiProviderConfig {
                host: OPENAI_HOST.to_string(),
                api_key: secrets.openai_api_key.clone(),
                model: self
                    .model
                    .clone()
                    .unwrap_or_else(|| OPENAI_MODEL.to_string()),
                temperature: Some(0.0),
                max_tokens: Some(2000),
            }),
            ProviderType::Ollama => ProviderConfig::Ollama(OllamaProviderConfig {
                host: self.ollama_host.clone(),
                model: self
                    .model
                    .clone()
                    .unwrap_or_else(|| OLLAMA_MODEL.to_string()),
                temperature: Some(0.0),
                max_tokens: None,
            }),
        }
    }
}
