#![allow(dead_code)]


use std::path::{Path, PathBuf};
use std::sync::Arc;

use recepta::application::ports::{LlmClient, RecordStore, TranscriptionEngine};
use recepta::application::services::{PrescriptionService, ResponseNormalizer};
use recepta::infrastructure::storage::JsonFileRecordStore;
use recepta::presentation::{AppState, create_router};

pub use fakes::{FakeLlmClient, FakeTranscriptionEngine};

pub const FLU_TEXT: &str = "Patient has flu, prescribe Tamiflu 75mg twice daily";

pub const FLU_COMPLETION: &str = r#"{"Prescriptions":[{"DiagnosisInformation":{"Diagnosis":"Flu","Medicine":"Tamiflu"},"MedicationDetails":{"Dose":"75","DoseUnit":"mg","DoseRoute":"oral","Frequency":"2","FrequencyDuration":"1","FrequencyUnit":"day","Quantity":"14","QuantityUnit":"tablets","Refill":"0","Pharmacy":"None"},"Description":"None"}]}"#;

/// A RIFF/WAVE header followed by a little silence.
pub const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00\x00\x00\x00\x00";

pub struct TestHarness {
    pub service: Arc<PrescriptionService>,
    pub llm: Arc<FakeLlmClient>,
    pub engine: Arc<FakeTranscriptionEngine>,
    pub store: Arc<JsonFileRecordStore>,
    pub scratch_dir: tempfile::TempDir,
    data_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn new(engine: FakeTranscriptionEngine, llm: FakeLlmClient) -> Self {
        Self::with_normalizer(engine, llm, ResponseNormalizer::default())
    }

    pub fn with_normalizer(
        engine: FakeTranscriptionEngine,
        llm: FakeLlmClient,
        normalizer: ResponseNormalizer,
    ) -> Self {
        let scratch_dir = tempfile::TempDir::new().unwrap();
        let data_dir = tempfile::TempDir::new().unwrap();

        let llm = Arc::new(llm);
        let engine = Arc::new(engine);
        let store = Arc::new(JsonFileRecordStore::new(
            data_dir.path().join("prescriptions_dataset.json"),
        ));

        let service = Arc::new(PrescriptionService::new(
            Arc::clone(&engine) as Arc<dyn TranscriptionEngine>,
            Arc::clone(&llm) as Arc<dyn LlmClient>,
            Arc::clone(&store) as Arc<dyn RecordStore>,
            normalizer,
            Some(scratch_dir.path().to_path_buf()),
        ));

        Self {
            service,
            llm,
            engine,
            store,
            scratch_dir,
            data_dir,
        }
    }

    pub fn replying(completion: &str) -> Self {
        Self::new(
            FakeTranscriptionEngine::replying(FLU_TEXT),
            FakeLlmClient::replying(completion),
        )
    }

    pub fn records_path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    pub fn scratch_files(&self) -> Vec<PathBuf> {
        list_dir(self.scratch_dir.path())
    }

    pub fn router(&self) -> axum::Router {
        create_router(AppState {
            prescription_service: Arc::clone(&self.service),
            max_upload_bytes: 1024 * 1024,
        })
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}
