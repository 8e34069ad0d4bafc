use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{Provider, ScaffoldConfig, TranscriptionSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;
use super::scaffold_transcription_engine::ScaffoldTranscriptionEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
        scaffold: &ScaffoldConfig,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        if scaffold.enabled {
            tracing::warn!("Scaffold mode: dictations are transcribed offline");
            return Ok(Arc::new(ScaffoldTranscriptionEngine::new(
                scaffold.mock_response_delay_ms,
            )));
        }

        if settings.api_key.is_empty() {
            return Err(TranscriptionError::Configuration(
                "API key required for remote transcription".to_string(),
            ));
        }

        match settings.provider {
            Provider::OpenAi => {
                tracing::info!(model = %settings.model, "Using OpenAI transcription");
                Ok(Arc::new(OpenAiWhisperEngine::new(
                    settings.api_key.clone(),
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                )))
            }
            Provider::Azure => {
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "transcription.base_url required for Azure".to_string(),
                    )
                })?;
                let deployment = settings.azure_deployment.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "transcription.azure_deployment required for Azure".to_string(),
                    )
                })?;
                tracing::info!(deployment = %deployment, "Using Azure OpenAI transcription");
                Ok(Arc::new(AzureWhisperEngine::new(
                    base_url,
                    deployment,
                    &settings.api_key,
                    &settings.azure_api_version,
                )))
            }
        }
    }
}
