use serde_json::Value;

use crate::domain::{PartialPrescriptionRecord, PrescriptionRecord, PrescriptionResponse};

/// Token the completion model is known to emit unquoted, e.g. as a dosage
/// frequency range.
const BARE_RANGE: &str = "1-2";
const PRESCRIPTIONS_KEY: &str = "Prescriptions";
/// A record must carry at least one of these, otherwise nothing the model
/// said would survive completion.
const RECORD_KEYS: [&str; 3] = ["DiagnosisInformation", "MedicationDetails", "Description"];

/// Quotes every bare `1-2` in a raw completion so the text can be parsed as
/// JSON.
///
/// A textual patch for one observed model defect, not a general JSON repair.
/// Occurrences already wrapped in double quotes are left alone, so the patch
/// is idempotent.
pub fn repair_known_defects(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut repaired = String::with_capacity(raw.len() + 8);
    let mut cursor = 0;

    for (start, _) in raw.match_indices(BARE_RANGE) {
        let end = start + BARE_RANGE.len();
        let quoted = start > 0 && bytes[start - 1] == b'"' && bytes.get(end) == Some(&b'"');

        repaired.push_str(&raw[cursor..start]);
        if quoted {
            repaired.push_str(BARE_RANGE);
        } else {
            repaired.push('"');
            repaired.push_str(BARE_RANGE);
            repaired.push('"');
        }
        cursor = end;
    }

    repaired.push_str(&raw[cursor..]);
    repaired
}

/// A completion that does not end with `}` was cut off or is not JSON at all.
pub fn looks_complete(text: &str) -> bool {
    text.trim().ends_with('}')
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("completion is truncated or not a JSON object")]
    Truncated,
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unexpected structure: {0}")]
    Shape(String),
    #[error("completion contains no prescriptions")]
    Empty,
}

/// Turns raw completion text into a [`PrescriptionResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer {
    fill_partial_groups: bool,
}

impl ResponseNormalizer {
    /// With `fill_partial_groups` unset, a group the model did return is kept
    /// exactly as returned even when some of its leaves are missing; only
    /// wholly absent groups are replaced by unknown-filled ones.
    pub fn new(fill_partial_groups: bool) -> Self {
        Self {
            fill_partial_groups,
        }
    }

    /// Repair, then parse. Used where the caller needs a hard failure.
    pub fn normalize(&self, raw: &str) -> Result<PrescriptionResponse, NormalizeError> {
        let repaired = repair_known_defects(raw);
        self.parse(&repaired)
    }

    /// Repair, reject text that does not end like a JSON object, then parse.
    pub fn normalize_checked(&self, raw: &str) -> Result<PrescriptionResponse, NormalizeError> {
        let repaired = repair_known_defects(raw);
        if !looks_complete(&repaired) {
            return Err(NormalizeError::Truncated);
        }
        self.parse(&repaired)
    }

    /// Like [`Self::normalize_checked`] but never fails: any error yields the
    /// fallback sentinel.
    pub fn normalize_or_fallback(&self, raw: &str) -> PrescriptionResponse {
        self.normalize_checked(raw)
            .unwrap_or_else(|_| PrescriptionResponse::fallback())
    }

    fn parse(&self, repaired: &str) -> Result<PrescriptionResponse, NormalizeError> {
        let value: Value = serde_json::from_str(repaired)?;
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(NormalizeError::Shape(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        let entries = match root.remove(PRESCRIPTIONS_KEY) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(NormalizeError::Shape(format!(
                    "{PRESCRIPTIONS_KEY} must be an array, got {}",
                    json_kind(&other)
                )));
            }
            None => vec![Value::Object(root)],
        };

        if entries.is_empty() {
            return Err(NormalizeError::Empty);
        }

        let prescriptions = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| self.complete_entry(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PrescriptionResponse::new(prescriptions))
    }

    fn complete_entry(
        &self,
        index: usize,
        entry: Value,
    ) -> Result<PrescriptionRecord, NormalizeError> {
        let Some(fields) = entry.as_object() else {
            return Err(NormalizeError::Shape(format!(
                "prescription {index} must be an object, got {}",
                json_kind(&entry)
            )));
        };

        if !RECORD_KEYS.iter().any(|key| fields.contains_key(*key)) {
            let found = fields.keys().map(String::as_str).collect::<Vec<_>>();
            return Err(NormalizeError::Shape(format!(
                "prescription {index} has none of {} (keys: [{}])",
                RECORD_KEYS.join(", "),
                found.join(", ")
            )));
        }

        let partial: PartialPrescriptionRecord = serde_json::from_value(entry)
            .map_err(|e| NormalizeError::Shape(format!("prescription {index}: {e}")))?;

        Ok(partial.complete(self.fill_partial_groups))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
