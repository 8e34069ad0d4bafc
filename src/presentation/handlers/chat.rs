use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::TextError;
use crate::domain::PrescriptionResponse;
use crate::presentation::state::AppState;

use super::error_response::ErrorResponse;
use super::form_fields::FormFields;

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: PrescriptionResponse,
}

/// Manual-text extraction. Always 200 once text is present; extraction
/// failures come back as the fallback prescription.
#[tracing::instrument(skip(state, form))]
pub async fn chat_handler(State(state): State<AppState>, form: FormFields) -> Response {
    let text = form.get("text").unwrap_or_default();

    match state.prescription_service.extract_from_text(text).await {
        Ok(outcome) => {
            tracing::info!(resolution = ?outcome.resolution, "Manual prescription extracted");
            (
                StatusCode::OK,
                Json(ChatResponse {
                    response: outcome.response,
                }),
            )
                .into_response()
        }
        Err(TextError::NoInput) => {
            ErrorResponse::new("No text provided").into_response_with(StatusCode::BAD_REQUEST)
        }
    }
}
