use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::infrastructure::observability::log_excerpt;

/// Offline stand-in for the completion service. Answers every request with
/// one well-formed prescription that echoes the request in its description.
pub struct ScaffoldLlmClient {
    delay: Duration,
}

impl ScaffoldLlmClient {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[async_trait]
impl LlmClient for ScaffoldLlmClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmClientError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let completion = serde_json::json!({
            "Prescriptions": [{
                "DiagnosisInformation": { "Diagnosis": "None", "Medicine": "None" },
                "MedicationDetails": {
                    "Dose": "None", "DoseUnit": "None", "DoseRoute": "None",
                    "Frequency": "None", "FrequencyDuration": "None", "FrequencyUnit": "None",
                    "Quantity": "None", "QuantityUnit": "None", "Refill": "None",
                    "Pharmacy": "None"
                },
                "Description": format!("Scaffold mode: {}", log_excerpt(user_message)),
            }]
        });

        Ok(completion.to_string())
    }
}
