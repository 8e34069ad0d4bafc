mod chat;
mod error_response;
mod form_fields;
mod health;
mod save_prescription;
mod transcribe;

pub use chat::{ChatResponse, chat_handler};
pub use error_response::ErrorResponse;
pub use form_fields::FormFields;
pub use health::health_handler;
pub use save_prescription::{SaveResponse, save_prescription_handler};
pub use transcribe::{DictationResponse, transcribe_stream_handler};
