mod llm_client;
mod record_store;
mod transcription_engine;

pub use llm_client::{LlmClient, LlmClientError};
pub use record_store::{RecordStore, RecordStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
