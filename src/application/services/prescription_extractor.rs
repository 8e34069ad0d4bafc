use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};

/// Instruction sent with every extraction request. Both flows share this one
/// constant so the model sees byte-identical instructions.
pub const SYSTEM_PROMPT: &str = concat!(
    "You are a helpful assistant that generates prescriptions. ",
    "Always return the prescription in the following JSON format: ",
    "(Warn doctor in Description if you suspect any drug conflicts). ",
    "If any information is missing, use 'None' as the value for that field.",
    "{ \"Prescriptions\": [ { ",
    "\"DiagnosisInformation\": { \"Diagnosis\": \"<diagnosis>\", \"Medicine\": \"<medicine>\" }, ",
    "\"MedicationDetails\": { ",
    "\"Dose\": \"<dose>\", \"DoseUnit\": \"<dose unit>\", \"DoseRoute\": \"<dose route>\", ",
    "\"Frequency\": \"<frequency>\", \"FrequencyDuration\": \"<frequency duration>\", ",
    "\"FrequencyUnit\": \"<frequency unit>\", \"Quantity\": \"<quantity>\", ",
    "\"QuantityUnit\": \"<quantity unit>\", \"Refill\": \"<refill>\", ",
    "\"Pharmacy\": \"<pharmacy>\" }, ",
    "\"Description\": \"<description>\" } ] }",
);

pub struct PrescriptionExtractor {
    llm_client: Arc<dyn LlmClient>,
}

impl PrescriptionExtractor {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    /// Returns the model's completion, trimmed, without checking that it is
    /// JSON.
    pub async fn extract(&self, user_text: &str) -> Result<String, LlmClientError> {
        let completion = self.llm_client.complete(SYSTEM_PROMPT, user_text).await?;
        Ok(completion.trim().to_string())
    }
}
