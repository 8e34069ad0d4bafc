use std::io;

use serde_json::Value;

use crate::domain::SavedPrescription;

/// Append-only log of confirmed prescriptions.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, prescription: Value) -> Result<SavedPrescription, RecordStoreError>;

    async fn load_all(&self) -> Result<Vec<SavedPrescription>, RecordStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
