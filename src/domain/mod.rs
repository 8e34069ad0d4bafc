mod field_value;
mod prescription;
mod saved_prescription;

pub use field_value::{FieldValue, UNKNOWN_DISPLAY};
pub use prescription::{
    DiagnosisInformation, FALLBACK_DESCRIPTION, MedicationDetails, PartialPrescriptionRecord,
    PrescriptionRecord, PrescriptionResponse,
};
pub use saved_prescription::{SavedPrescription, medicine_of};
