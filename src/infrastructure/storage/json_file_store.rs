use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::application::ports::{RecordStore, RecordStoreError};
use crate::domain::SavedPrescription;

/// Prescription log kept as one pretty-printed JSON array on disk.
///
/// Every append reads the whole array, pushes one entry and rewrites the
/// file. There is no locking: concurrent appends can lose entries.
pub struct JsonFileRecordStore {
    path: PathBuf,
}

impl JsonFileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries are read untyped so that an append never drops entries written
    /// by an older schema.
    async fn read_entries(&self) -> Result<Vec<Value>, RecordStoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Value>>(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Prescription log is unreadable, starting a new one"
                );
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for JsonFileRecordStore {
    async fn append(&self, prescription: Value) -> Result<SavedPrescription, RecordStoreError> {
        let mut entries = self.read_entries().await?;
        let entry = SavedPrescription::new(prescription);
        entries.push(serde_json::to_value(&entry)?);

        let serialized = serde_json::to_vec_pretty(&entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serialized).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "Prescription log rewritten"
        );

        Ok(entry)
    }

    async fn load_all(&self) -> Result<Vec<SavedPrescription>, RecordStoreError> {
        self.read_entries()
            .await?
            .into_iter()
            .map(|entry| serde_json::from_value(entry).map_err(RecordStoreError::from))
            .collect()
    }
}
