use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_format::AudioFormat;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "whisper-1";

/// Dictation transcription through the OpenAI audio API. The plain-text
/// response format is requested so the body is the transcript itself.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn dictation_form(&self, dictation: &[u8]) -> Result<(Form, AudioFormat), TranscriptionError> {
        let format = AudioFormat::sniff(dictation);
        let recording = Part::bytes(dictation.to_vec())
            .file_name(format.file_name())
            .mime_str(format.mime())
            .map_err(|e| {
                TranscriptionError::ApiRequestFailed(format!(
                    "cannot label dictation as {}: {}",
                    format.mime(),
                    e
                ))
            })?;

        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", recording);

        Ok((form, format))
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(&self, dictation: &[u8]) -> Result<String, TranscriptionError> {
        let (form, format) = self.dictation_form(dictation)?;

        tracing::debug!(
            model = %self.model,
            format = ?format,
            bytes = dictation.len(),
            "Uploading dictation for transcription"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                TranscriptionError::ApiRequestFailed(format!(
                    "dictation upload to {} failed: {}",
                    self.endpoint, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Transcription service rejected the dictation");
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "transcription rejected dictation with status {}: {}",
                status, body
            )));
        }

        let transcript = response.text().await.map_err(|e| {
            TranscriptionError::ApiRequestFailed(format!("unreadable transcript body: {}", e))
        })?;
        let transcript = transcript.trim().to_string();

        tracing::info!(
            chars = transcript.len(),
            format = ?format,
            "Dictation transcribed"
        );

        Ok(transcript)
    }
}
