use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the append-only prescription log.
///
/// The prescription is kept exactly as the clinician confirmed it, so it is
/// stored as raw JSON rather than re-shaped through [`super::PrescriptionRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPrescription {
    pub prescription: Value,
    pub timestamp: DateTime<Utc>,
}

impl SavedPrescription {
    pub fn new(prescription: Value) -> Self {
        Self {
            prescription,
            timestamp: Utc::now(),
        }
    }

    /// `DiagnosisInformation.Medicine` of the stored record, if addressable.
    pub fn medicine(&self) -> Option<&Value> {
        medicine_of(&self.prescription)
    }
}

pub fn medicine_of(prescription: &Value) -> Option<&Value> {
    prescription.pointer("/DiagnosisInformation/Medicine")
}
