use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{AudioUpload, DictationError, DictationFailure};
use crate::domain::PrescriptionResponse;
use crate::presentation::state::AppState;

use super::error_response::ErrorResponse;

const AUDIO_FIELD: &str = "audio";

#[derive(Serialize)]
pub struct DictationResponse {
    pub response: PrescriptionResponse,
    pub transcript: String,
    pub logs: Vec<String>,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_stream_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Dictation request is not multipart");
            return unreadable_upload(rejection.status(), rejection.body_text());
        }
    };

    let upload = match read_audio_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    match state
        .prescription_service
        .transcribe_and_extract(upload)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(DictationResponse {
                response: outcome.response,
                transcript: outcome.transcript,
                logs: outcome.logs,
            }),
        )
            .into_response(),
        Err(failure) => failure_response(failure),
    }
}

/// Takes the field named `audio`, or the first file field when none is.
async fn read_audio_upload(mut multipart: Multipart) -> Result<Option<AudioUpload>, Response> {
    let mut upload = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(unreadable_upload(e.status(), e));
            }
        };

        let named_audio = field.name() == Some(AUDIO_FIELD);
        if !named_audio && (upload.is_some() || field.file_name().is_none()) {
            continue;
        }

        let filename = field.file_name().unwrap_or("unknown").to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read audio bytes");
            unreadable_upload(e.status(), e)
        })?;

        tracing::debug!(filename = %filename, bytes = data.len(), "Audio upload received");
        upload = Some(AudioUpload {
            filename,
            data: data.to_vec(),
        });

        if named_audio {
            break;
        }
    }

    Ok(upload)
}

/// The body could not be read as a multipart upload at all.
fn unreadable_upload(status: StatusCode, error: impl ToString) -> Response {
    let details = error.to_string();
    ErrorResponse::new("Failed to read audio upload")
        .with_logs(vec![format!("Failed to read audio upload: {}", details)])
        .with_details(details)
        .into_response_with(status)
}

fn failure_response(failure: DictationFailure) -> Response {
    let DictationFailure {
        error,
        transcript,
        logs,
    } = failure;

    let (status, body) = match &error {
        DictationError::NoAudio => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("No audio file provided"),
        ),
        DictationError::Normalization(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Failed to generate prescription").with_details(e),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Audio processing failed").with_details(other),
        ),
    };

    body.with_transcript(transcript)
        .with_logs(logs)
        .into_response_with(status)
}
