use std::sync::Arc;

use crate::application::ports::LlmClient;
use crate::presentation::config::{LlmSettings, ScaffoldConfig};

use super::openai_client::OpenAiClient;
use super::scaffold_llm_client::ScaffoldLlmClient;

pub struct LlmClientFactory;

#[derive(Debug, thiserror::Error)]
pub enum LlmClientFactoryError {
    #[error("missing API key: set APP__LLM__API_KEY or OPENAI_API_KEY")]
    MissingApiKey,
}

impl LlmClientFactory {
    pub fn create(
        settings: &LlmSettings,
        scaffold: &ScaffoldConfig,
    ) -> Result<Arc<dyn LlmClient>, LlmClientFactoryError> {
        if scaffold.enabled {
            tracing::warn!("Scaffold mode: completion requests are answered offline");
            return Ok(Arc::new(ScaffoldLlmClient::new(
                scaffold.mock_response_delay_ms,
            )));
        }

        if settings.api_key.is_empty() {
            return Err(LlmClientFactoryError::MissingApiKey);
        }

        tracing::info!(
            provider = ?settings.provider,
            model = %settings.chat_model,
            max_tokens = settings.max_tokens,
            temperature = settings.temperature,
            "Using remote completion service"
        );
        Ok(Arc::new(OpenAiClient::new(settings)))
    }
}
