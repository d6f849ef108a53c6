use strum_macros::{Display, EnumIter, EnumString};

use super::{
    base::Provider, configs::ProviderConfig, ollama::OllamaProvider, openai::OpenAiProvider,
};
use crate::errors::{AgentError, AgentResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderType {
    OpenAi,
    Ollama,
}

/// Build and preflight the configured backend. Any failure here (missing
/// credential, unreachable server) is a `BackendUnavailable`, raised before
/// the caller commits to a conversation.
pub async fn connect(config: ProviderConfig) -> AgentResult<Box<dyn Provider + Send + Sync>> {
    match config {
        ProviderConfig::OpenAi(openai_config) => {
            let provider = OpenAiProvider::new(openai_config)
                .map_err(|e| AgentError::BackendUnavailable(e.to_string()))?;
            Ok(Box::new(provider))
        }
        ProviderConfig::Ollama(ollama_config) => {
            let provider = OllamaProvider::connect(ollama_config)
                .await
                .map_err(|e| AgentError::BackendUnavailable(e.to_string()))?;
            Ok(Box::new(provider))
        }
    }
}
