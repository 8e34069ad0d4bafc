use std::collections::HashMap;

use axum::Form;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;

use super::error_response::ErrorResponse;

/// Text form fields from either a url-encoded or a multipart body; browser
/// clients send both.
#[derive(Debug, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| malformed(rejection.status(), rejection.body_text()))?;
            return Ok(Self(fields));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| malformed(rejection.status(), rejection.body_text()))?;
        let mut fields = HashMap::new();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err(malformed(e.status(), e)),
            };
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(|e| malformed(e.status(), e))?;
            fields.insert(name, value);
        }

        Ok(Self(fields))
    }
}

fn malformed(status: StatusCode, error: impl ToString) -> Response {
    tracing::warn!(error = %error.to_string(), "Failed to read form body");
    ErrorResponse::new("Failed to read form body")
        .with_details(error)
        .into_response_with(status)
}
