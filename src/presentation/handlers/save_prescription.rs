use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::application::services::SaveError;
use crate::presentation::state::AppState;

use super::error_response::ErrorResponse;
use super::form_fields::FormFields;

#[derive(Serialize)]
pub struct SaveResponse {
    pub message: String,
}

#[tracing::instrument(skip(state, form))]
pub async fn save_prescription_handler(
    State(state): State<AppState>,
    form: FormFields,
) -> Response {
    let Some(raw) = form.get("prescription") else {
        tracing::warn!("Save request without prescription field");
        return ErrorResponse::new("No prescription data provided")
            .into_response_with(StatusCode::BAD_REQUEST);
    };

    let payload: Value = match serde_json::from_str(raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Save request with invalid JSON");
            return ErrorResponse::new("Invalid JSON format")
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    match state.prescription_service.save(payload).await {
        Ok(message) => (StatusCode::OK, Json(SaveResponse { message })).into_response(),
        Err(SaveError::MissingPrescription) => ErrorResponse::new("No prescription data provided")
            .into_response_with(StatusCode::BAD_REQUEST),
        Err(SaveError::MissingMedicine) => {
            ErrorResponse::new("Prescription is missing DiagnosisInformation.Medicine")
                .into_response_with(StatusCode::BAD_REQUEST)
        }
        Err(SaveError::Store(e)) => ErrorResponse::new("Failed to save prescription")
            .with_details(e)
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
