use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_format::AudioFormat;

/// Transcription through an Azure OpenAI speech-to-text deployment.
pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_version: String,
    api_key: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/openai/deployments/{}/audio/transcriptions",
                base_url.trim_end_matches('/'),
                deployment,
            ),
            api_version: api_version.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct AzureTranscriptionResponse {
    text: String,
}

#[derive(Deserialize)]
struct AzureErrorEnvelope {
    error: AzureErrorBody,
}

#[derive(Deserialize)]
struct AzureErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<AzureErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "status {} ({}): {}",
            status,
            envelope.error.code.as_deref().unwrap_or("unknown"),
            envelope.error.message
        ),
        Err(_) => format!("status {}: {}", status, body),
    }
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let format = AudioFormat::sniff(audio_data);
        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name(format.file_name())
            .mime_str(format.mime())
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new().part("file", file_part);

        tracing::debug!(format = ?format, bytes = audio_data.len(), "Sending dictation to Azure OpenAI transcription");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::ApiRequestFailed(describe_failure(
                status, &body,
            )));
        }

        let result: AzureTranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {}", e)))?;

        tracing::info!(chars = result.text.len(), "Dictation transcribed");

        Ok(result.text.trim().to_string())
    }
}
