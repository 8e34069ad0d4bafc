use recepta::application::services::{
    NormalizeError, ResponseNormalizer, looks_complete, repair_known_defects,
};
use recepta::domain::{DiagnosisInformation, FieldValue, MedicationDetails, PrescriptionResponse};
use serde_json::{Value, json};

use crate::helpers::FLU_COMPLETION;

#[test]
fn given_bare_range_when_repairing_then_range_is_quoted() {
    let repaired = repair_known_defects(r#"{"Frequency": 1-2}"#);

    assert_eq!(repaired, r#"{"Frequency": "1-2"}"#);
}

#[test]
fn given_repaired_text_when_repairing_again_then_text_is_unchanged() {
    let once = repair_known_defects(r#"{"Frequency": 1-2, "Quantity": 1-2}"#);
    let twice = repair_known_defects(&once);

    assert_eq!(once, twice);
}

#[test]
fn given_text_without_range_when_repairing_then_text_is_unchanged() {
    assert_eq!(repair_known_defects(FLU_COMPLETION), FLU_COMPLETION);
}

#[test]
fn given_trailing_whitespace_when_checking_completeness_then_brace_still_counts() {
    assert!(looks_complete("{\"a\": 1}\n  "));
    assert!(!looks_complete("{\"Prescriptions\": [{\"Diagnosis"));
    assert!(!looks_complete("I'm sorry, I can't help with that."));
}

#[test]
fn given_complete_completion_when_normalizing_then_output_equals_input() {
    let normalizer = ResponseNormalizer::default();

    let response = normalizer.normalize(FLU_COMPLETION).unwrap();

    let expected: Value = serde_json::from_str(FLU_COMPLETION).unwrap();
    assert_eq!(serde_json::to_value(&response).unwrap(), expected);
    assert_eq!(
        response.prescriptions[0].medication_details.pharmacy,
        Some(FieldValue::known("None"))
    );
}

#[test]
fn given_bare_range_frequency_when_normalizing_then_frequency_is_the_string() {
    let normalizer = ResponseNormalizer::default();
    let raw = r#"{"Prescriptions":[{"DiagnosisInformation":{"Diagnosis":"Pain","Medicine":"Ibuprofen"},"MedicationDetails":{"Frequency":1-2},"Description":"None"}]}"#;

    let response = normalizer.normalize(raw).unwrap();

    assert_eq!(
        response.prescriptions[0].medication_details.frequency,
        Some(FieldValue::known("1-2"))
    );
}

#[test]
fn given_record_without_groups_when_normalizing_then_groups_are_unknown_filled() {
    let normalizer = ResponseNormalizer::default();
    let raw = r#"{"Prescriptions":[{"Description":"rest"}]}"#;

    let response = normalizer.normalize(raw).unwrap();

    let record = &response.prescriptions[0];
    assert_eq!(record.diagnosis_information, DiagnosisInformation::unknown());
    assert_eq!(record.medication_details, MedicationDetails::unknown());
    assert_eq!(record.description, FieldValue::known("rest"));
}

#[test]
fn given_partial_group_when_normalizing_by_default_then_group_is_kept_as_returned() {
    let normalizer = ResponseNormalizer::default();
    let raw = r#"{"Prescriptions":[{"DiagnosisInformation":{"Medicine":"Amoxicillin"}}]}"#;

    let response = normalizer.normalize(raw).unwrap();

    let serialized = serde_json::to_value(&response).unwrap();
    assert_eq!(
        serialized["Prescriptions"][0]["DiagnosisInformation"],
        json!({ "Medicine": "Amoxicillin" })
    );
}

#[test]
fn given_partial_group_when_fill_enabled_then_missing_leaves_become_null() {
    let normalizer = ResponseNormalizer::new(true);
    let raw = r#"{"Prescriptions":[{"DiagnosisInformation":{"Medicine":"Amoxicillin"}}]}"#;

    let response = normalizer.normalize(raw).unwrap();

    let serialized = serde_json::to_value(&response).unwrap();
    assert_eq!(
        serialized["Prescriptions"][0]["DiagnosisInformation"],
        json!({ "Diagnosis": null, "Medicine": "Amoxicillin" })
    );
    assert!(response.prescriptions[0].is_complete());
}

#[test]
fn given_single_object_without_list_when_normalizing_then_treated_as_one_record() {
    let normalizer = ResponseNormalizer::default();
    let raw = r#"{"DiagnosisInformation":{"Diagnosis":"Flu","Medicine":"Tamiflu"}}"#;

    let response = normalizer.normalize(raw).unwrap();

    assert_eq!(response.prescriptions.len(), 1);
    assert_eq!(
        response.prescriptions[0].diagnosis_information.medicine,
        Some(FieldValue::known("Tamiflu"))
    );
}

#[test]
fn given_several_records_when_normalizing_then_order_is_preserved() {
    let normalizer = ResponseNormalizer::default();
    let raw = r#"{"Prescriptions":[
        {"DiagnosisInformation":{"Diagnosis":"Flu","Medicine":"Tamiflu"}},
        {"DiagnosisInformation":{"Diagnosis":"Fever","Medicine":"Paracetamol"}}
    ]}"#;

    let response = normalizer.normalize(raw).unwrap();

    let medicines: Vec<String> = response
        .prescriptions
        .iter()
        .map(|p| p.diagnosis_information.medicine.clone().unwrap_or_default().to_string())
        .collect();
    assert_eq!(medicines, vec!["Tamiflu", "Paracetamol"]);
}

#[test]
fn given_invalid_json_when_normalizing_then_returns_malformed() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize("{ this is not json }");

    assert!(matches!(result, Err(NormalizeError::Malformed(_))));
}

#[test]
fn given_cut_off_completion_when_checked_then_returns_truncated() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize_checked(r#"{"Prescriptions":[{"DiagnosisInformation":"#);

    assert!(matches!(result, Err(NormalizeError::Truncated)));
}

#[test]
fn given_empty_list_when_normalizing_then_returns_empty() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize(r#"{"Prescriptions":[]}"#);

    assert!(matches!(result, Err(NormalizeError::Empty)));
}

#[test]
fn given_non_array_list_when_normalizing_then_returns_shape_error() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize(r#"{"Prescriptions":"none"}"#);

    assert!(matches!(result, Err(NormalizeError::Shape(_))));
}

#[test]
fn given_top_level_array_when_normalizing_then_returns_shape_error() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize(r#"[{"Description":"x"}]"#);

    assert!(matches!(result, Err(NormalizeError::Shape(_))));
}

#[test]
fn given_garbage_when_normalizing_or_falling_back_then_returns_fallback() {
    let normalizer = ResponseNormalizer::default();

    let response = normalizer.normalize_or_fallback("I cannot read that prescription.");

    assert_eq!(response, PrescriptionResponse::fallback());
}

#[test]
fn given_null_group_when_normalizing_then_group_is_unknown_filled() {
    let normalizer = ResponseNormalizer::default();
    let raw = r#"{"Prescriptions":[{"DiagnosisInformation":null,"MedicationDetails":{"Dose":"5"}}]}"#;

    let response = normalizer.normalize(raw).unwrap();

    assert_eq!(
        response.prescriptions[0].diagnosis_information,
        DiagnosisInformation::unknown()
    );
}

#[test]
fn given_group_of_wrong_type_when_normalizing_then_returns_shape_error() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize(r#"{"Prescriptions":[{"MedicationDetails":"twice daily"}]}"#);

    assert!(matches!(result, Err(NormalizeError::Shape(_))));
}

#[test]
fn given_non_object_entry_when_normalizing_then_returns_shape_error() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize(r#"{"Prescriptions":["Tamiflu"]}"#);

    assert!(matches!(result, Err(NormalizeError::Shape(_))));
}

const CAMEL_CASE_COMPLETION: &str =
    r#"{"prescriptions":[{"diagnosisInformation":{"diagnosis":"Flu","medicine":"Tamiflu"}}]}"#;

#[test]
fn given_empty_object_when_normalizing_then_returns_shape_error() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize_checked("{}");

    assert!(matches!(result, Err(NormalizeError::Shape(_))));
}

#[test]
fn given_camel_case_keys_when_normalizing_then_returns_shape_error_instead_of_unknowns() {
    let normalizer = ResponseNormalizer::default();

    let result = normalizer.normalize_checked(CAMEL_CASE_COMPLETION);

    match result {
        Err(NormalizeError::Shape(message)) => {
            assert!(message.contains("prescriptions"), "unexpected message: {message}");
        }
        other => panic!("expected Shape, got {other:?}"),
    }
}

#[test]
fn given_listed_entry_without_record_keys_when_normalizing_then_returns_shape_error() {
    let normalizer = ResponseNormalizer::default();

    let result =
        normalizer.normalize(r#"{"Prescriptions":[{"diagnosisInformation":{"medicine":"Tamiflu"}}]}"#);

    assert!(matches!(result, Err(NormalizeError::Shape(_))));
}

#[test]
fn given_camel_case_keys_when_normalizing_or_falling_back_then_returns_fallback() {
    let response = ResponseNormalizer::default().normalize_or_fallback(CAMEL_CASE_COMPLETION);

    assert!(response.is_fallback());
}
