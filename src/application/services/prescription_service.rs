use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::application::ports::{
    LlmClient, LlmClientError, RecordStore, RecordStoreError, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{FieldValue, PrescriptionResponse, medicine_of};
use crate::infrastructure::observability::log_excerpt;

use super::flow_log::FlowLog;
use super::prescription_extractor::PrescriptionExtractor;
use super::response_normalizer::{NormalizeError, ResponseNormalizer};
use super::scratch_audio::ScratchAudio;

/// An audio upload as received from the client.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DictationOutcome {
    pub response: PrescriptionResponse,
    pub transcript: String,
    pub logs: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DictationError {
    #[error("no audio file provided")]
    NoAudio,
    #[error("staging audio failed: {0}")]
    Staging(#[from] io::Error),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("completion: {0}")]
    Completion(#[from] LlmClientError),
    #[error("normalization: {0}")]
    Normalization(#[from] NormalizeError),
}

/// A failed dictation, with whatever the flow produced before failing. The
/// transcript is kept because audio is expensive to record again.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct DictationFailure {
    pub error: DictationError,
    pub transcript: Option<String>,
    pub logs: Vec<String>,
}

/// How the manual-text flow arrived at its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextResolution {
    Normalized,
    Truncated,
    Unparseable,
    ExtractionFailed,
}

#[derive(Debug, Clone)]
pub struct TextOutcome {
    pub response: PrescriptionResponse,
    pub resolution: TextResolution,
}

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("no text provided")]
    NoInput,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("no prescription data provided")]
    MissingPrescription,
    #[error("prescription is missing DiagnosisInformation.Medicine")]
    MissingMedicine,
    #[error("store: {0}")]
    Store(#[from] RecordStoreError),
}

pub struct PrescriptionService {
    transcription_engine: Arc<dyn TranscriptionEngine>,
    extractor: PrescriptionExtractor,
    record_store: Arc<dyn RecordStore>,
    normalizer: ResponseNormalizer,
    scratch_dir: Option<PathBuf>,
}

impl PrescriptionService {
    pub fn new(
        transcription_engine: Arc<dyn TranscriptionEngine>,
        llm_client: Arc<dyn LlmClient>,
        record_store: Arc<dyn RecordStore>,
        normalizer: ResponseNormalizer,
        scratch_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            transcription_engine,
            extractor: PrescriptionExtractor::new(llm_client),
            record_store,
            normalizer,
            scratch_dir,
        }
    }

    /// Dictation flow: stage, transcribe, extract, normalize. Every failure is
    /// surfaced, with the transcript attached once one exists.
    #[tracing::instrument(skip(self, upload))]
    pub async fn transcribe_and_extract(
        &self,
        upload: Option<AudioUpload>,
    ) -> Result<DictationOutcome, DictationFailure> {
        let mut logs = FlowLog::new();

        let Some(upload) = upload.filter(|u| !u.data.is_empty()) else {
            logs.record("No audio file provided");
            tracing::warn!("Dictation request without audio");
            return Err(DictationFailure {
                error: DictationError::NoAudio,
                transcript: None,
                logs: logs.into_entries(),
            });
        };

        logs.record(format!("Received audio file: {}", upload.filename));

        let transcript = match self.transcribe_staged(&upload.data, &mut logs).await {
            Ok(transcript) => transcript,
            Err(error) => {
                logs.record(format!("Audio processing failed: {}", error));
                tracing::error!(error = %error, "Dictation transcription failed");
                return Err(DictationFailure {
                    error,
                    transcript: None,
                    logs: logs.into_entries(),
                });
            }
        };

        tracing::debug!(transcript = %log_excerpt(&transcript), "Requesting prescription extraction");

        let completion = match self.extractor.extract(&transcript).await {
            Ok(completion) => completion,
            Err(e) => {
                logs.record(format!("Audio processing failed: {}", e));
                tracing::error!(error = %e, "Dictation extraction failed");
                return Err(DictationFailure {
                    error: e.into(),
                    transcript: Some(transcript),
                    logs: logs.into_entries(),
                });
            }
        };
        logs.record(format!("Model response: {}", completion));

        match self.normalizer.normalize(&completion) {
            Ok(response) => {
                logs.record("Model response parsed as JSON");
                tracing::info!(
                    prescriptions = response.prescriptions.len(),
                    "Dictation normalized"
                );
                Ok(DictationOutcome {
                    response,
                    transcript,
                    logs: logs.into_entries(),
                })
            }
            Err(e) => {
                logs.record(format!("JSON parsing failed: {}", e));
                tracing::warn!(error = %e, "Dictation completion could not be normalized");
                Err(DictationFailure {
                    error: e.into(),
                    transcript: Some(transcript),
                    logs: logs.into_entries(),
                })
            }
        }
    }

    async fn transcribe_staged(
        &self,
        data: &[u8],
        logs: &mut FlowLog,
    ) -> Result<String, DictationError> {
        let scratch = ScratchAudio::stage(self.scratch_dir.as_deref(), data)?;
        logs.record("Audio file saved to temp path");
        tracing::debug!(path = %scratch.path().display(), "Staged dictation audio");

        // Dropping `scratch` on any early return removes the file.
        let staged = scratch.read().await?;
        let transcript = self.transcription_engine.transcribe(&staged).await?;
        logs.record(format!("Transcribed text: {}", transcript));

        match scratch.close() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Removed staged dictation audio");
                logs.record("Temporary file removed");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to remove staged dictation audio"),
        }

        Ok(transcript)
    }

    /// Manual-text flow. Only missing input is an error; every other failure
    /// degrades to the fallback sentinel so the caller always has something to
    /// render.
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn extract_from_text(&self, text: &str) -> Result<TextOutcome, TextError> {
        if text.trim().is_empty() {
            tracing::warn!("Manual prescription request with empty text");
            return Err(TextError::NoInput);
        }

        tracing::debug!(text = %log_excerpt(text), "Requesting prescription extraction");

        let completion = match self.extractor.extract(text).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed, returning fallback");
                return Ok(TextOutcome {
                    response: PrescriptionResponse::fallback(),
                    resolution: TextResolution::ExtractionFailed,
                });
            }
        };

        let (response, resolution) = match self.normalizer.normalize_checked(&completion) {
            Ok(response) => (response, TextResolution::Normalized),
            Err(NormalizeError::Truncated) => {
                tracing::warn!(
                    completion = %log_excerpt(&completion),
                    "Completion does not end with a JSON object, returning fallback"
                );
                (PrescriptionResponse::fallback(), TextResolution::Truncated)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Completion could not be normalized, returning fallback");
                (PrescriptionResponse::fallback(), TextResolution::Unparseable)
            }
        };

        Ok(TextOutcome {
            response,
            resolution,
        })
    }

    /// Save flow. `payload` is the decoded `{ "prescription": ... }` body.
    /// Returns the confirmation message naming the saved medicine.
    #[tracing::instrument(skip(self, payload))]
    pub async fn save(&self, payload: Value) -> Result<String, SaveError> {
        let prescription = match payload {
            Value::Object(mut fields) => fields
                .remove("prescription")
                .ok_or(SaveError::MissingPrescription)?,
            _ => return Err(SaveError::MissingPrescription),
        };

        let medicine = medicine_of(&prescription)
            .map(FieldValue::from)
            .ok_or(SaveError::MissingMedicine)?;

        let saved = self.record_store.append(prescription).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to save prescription");
            SaveError::from(e)
        })?;

        tracing::info!(
            medicine = %medicine,
            timestamp = %saved.timestamp.to_rfc3339(),
            "Prescription saved"
        );

        Ok(format!("Prescription for {} saved successfully", medicine))
    }
}
