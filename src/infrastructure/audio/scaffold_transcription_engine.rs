use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Offline stand-in for the transcription service.
pub struct ScaffoldTranscriptionEngine {
    delay: Duration,
}

impl ScaffoldTranscriptionEngine {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for ScaffoldTranscriptionEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(format!(
            "Scaffold transcript of {} bytes of audio",
            audio_data.len()
        ))
    }
}
