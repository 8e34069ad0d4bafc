mod flow_log;
mod prescription_extractor;
mod prescription_service;
mod response_normalizer;
mod scratch_audio;

pub use flow_log::FlowLog;
pub use prescription_extractor::{PrescriptionExtractor, SYSTEM_PROMPT};
pub use prescription_service::{
    AudioUpload, DictationError, DictationFailure, DictationOutcome, PrescriptionService,
    SaveError, TextError, TextOutcome, TextResolution,
};
pub use response_normalizer::{
    NormalizeError, ResponseNormalizer, looks_complete, repair_known_defects,
};
pub use scratch_audio::ScratchAudio;
