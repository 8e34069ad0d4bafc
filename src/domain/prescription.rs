use serde::{Deserialize, Serialize};

use super::field_value::{FieldValue, present};

/// Description placed on the fallback record when no usable structure could be
/// extracted.
pub const FALLBACK_DESCRIPTION: &str = "Please try again with proper prescription content.";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiagnosisInformation {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub medicine: Option<FieldValue>,
}

impl DiagnosisInformation {
    pub fn unknown() -> Self {
        Self {
            diagnosis: Some(FieldValue::Unknown),
            medicine: Some(FieldValue::Unknown),
        }
    }

    pub fn fill_missing(&mut self) {
        for leaf in [&mut self.diagnosis, &mut self.medicine] {
            if leaf.is_none() {
                *leaf = Some(FieldValue::Unknown);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.diagnosis.is_some() && self.medicine.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MedicationDetails {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dose: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dose_unit: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dose_route: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub frequency_duration: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub frequency_unit: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub quantity_unit: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub refill: Option<FieldValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub pharmacy: Option<FieldValue>,
}

impl MedicationDetails {
    pub fn unknown() -> Self {
        let mut details = Self::default();
        details.fill_missing();
        details
    }

    pub fn fill_missing(&mut self) {
        for leaf in self.leaves_mut() {
            if leaf.is_none() {
                *leaf = Some(FieldValue::Unknown);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.dose,
            &self.dose_unit,
            &self.dose_route,
            &self.frequency,
            &self.frequency_duration,
            &self.frequency_unit,
            &self.quantity,
            &self.quantity_unit,
            &self.refill,
            &self.pharmacy,
        ]
        .iter()
        .all(|leaf| leaf.is_some())
    }

    fn leaves_mut(&mut self) -> [&mut Option<FieldValue>; 10] {
        [
            &mut self.dose,
            &mut self.dose_unit,
            &mut self.dose_route,
            &mut self.frequency,
            &mut self.frequency_duration,
            &mut self.frequency_unit,
            &mut self.quantity,
            &mut self.quantity_unit,
            &mut self.refill,
            &mut self.pharmacy,
        ]
    }
}

/// One structured prescription as returned to callers. All three groups are
/// always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrescriptionRecord {
    pub diagnosis_information: DiagnosisInformation,
    pub medication_details: MedicationDetails,
    pub description: FieldValue,
}

impl PrescriptionRecord {
    pub fn fallback() -> Self {
        Self {
            diagnosis_information: DiagnosisInformation::unknown(),
            medication_details: MedicationDetails::unknown(),
            description: FieldValue::known(FALLBACK_DESCRIPTION),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.diagnosis_information.is_complete() && self.medication_details.is_complete()
    }
}

/// A record as the completion model produced it, before group completion.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartialPrescriptionRecord {
    #[serde(default)]
    pub diagnosis_information: Option<DiagnosisInformation>,
    #[serde(default)]
    pub medication_details: Option<MedicationDetails>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<FieldValue>,
}

impl PartialPrescriptionRecord {
    /// Substitutes fully unknown groups for absent ones. Groups that are
    /// present are kept as they are unless `fill_leaves` is set, in which case
    /// their missing leaves are set to unknown as well.
    pub fn complete(self, fill_leaves: bool) -> PrescriptionRecord {
        let mut diagnosis_information = self
            .diagnosis_information
            .unwrap_or_else(DiagnosisInformation::unknown);
        let mut medication_details = self
            .medication_details
            .unwrap_or_else(MedicationDetails::unknown);

        if fill_leaves {
            diagnosis_information.fill_missing();
            medication_details.fill_missing();
        }

        PrescriptionRecord {
            diagnosis_information,
            medication_details,
            description: self.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrescriptionResponse {
    pub prescriptions: Vec<PrescriptionRecord>,
}

impl PrescriptionResponse {
    pub fn new(prescriptions: Vec<PrescriptionRecord>) -> Self {
        Self { prescriptions }
    }

    /// The sentinel returned whenever extraction or parsing fails in a flow
    /// that must always render something.
    pub fn fallback() -> Self {
        Self {
            prescriptions: vec![PrescriptionRecord::fallback()],
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
