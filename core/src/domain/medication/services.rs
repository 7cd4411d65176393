use tracing::{error, info, instrument};

use crate::domain::{
    common::services::Service,
    medication::{
        entities::MedicationRecord,
        parser::parse_medication_response,
        ports::{LLMClient, MedicationService},
        prompts::system_instruction,
        schema::get_medication_schema,
        value_objects::{IdentificationMode, IdentifyByImageInput, IdentifyByNameInput},
    },
};

impl<LLM> MedicationService for Service<LLM>
where
    LLM: LLMClient,
{
    #[instrument(skip(self, input), fields(language = %input.language, mime_type = %input.image.mime_type))]
    async fn identify_by_image(&self, input: IdentifyByImageInput) -> MedicationRecord {
        let instruction = system_instruction(input.language, IdentificationMode::Packaging);

        let raw_response = match self
            .llm_client
            .generate_with_image(instruction, input.prompt, input.image, get_medication_schema())
            .await
        {
            Ok(raw_response) => raw_response,
            Err(e) => {
                error!("Error identifying with image: {}", e);
                return MedicationRecord::transport_failure();
            }
        };

        let record = parse_medication_response(&raw_response);
        info!(outcome = ?record.outcome, "Image identification finished");

        record
    }

    #[instrument(skip(self, input), fields(language = %input.language, name = %input.name))]
    async fn identify_by_name(&self, input: IdentifyByNameInput) -> MedicationRecord {
        let instruction = system_instruction(input.language, IdentificationMode::Name);

        let raw_response = match self
            .llm_client
            .generate_with_text(instruction, input.prompt, get_medication_schema())
            .await
        {
            Ok(raw_response) => raw_response,
            Err(e) => {
                error!("Error identifying with name: {}", e);
                return MedicationRecord::transport_failure();
            }
        };

        let record = parse_medication_response(&raw_response);
        info!(outcome = ?record.outcome, "Name identification finished");

        record
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{
        common::entities::app_errors::CoreError,
        localization::Language,
        medication::{
            entities::{FailureReason, TRANSPORT_FAILURE_TEXT},
            value_objects::ImagePayload,
        },
    };

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        system_instruction: String,
        prompt: String,
        image: Option<ImagePayload>,
        response_schema: serde_json::Value,
    }

    struct FakeLlm {
        response: Result<String, CoreError>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl FakeLlm {
        fn answering(response: Result<&str, CoreError>) -> Self {
            Self {
                response: response.map(str::to_string),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LLMClient for FakeLlm {
        async fn generate_with_image(
            &self,
            system_instruction: String,
            prompt: String,
            image: ImagePayload,
            response_schema: serde_json::Value,
        ) -> Result<String, CoreError> {
            self.calls.lock().unwrap().push(RecordedCall {
                system_instruction,
                prompt,
                image: Some(image),
                response_schema,
            });
            self.response.clone()
        }

        async fn generate_with_text(
            &self,
            system_instruction: String,
            prompt: String,
            response_schema: serde_json::Value,
        ) -> Result<String, CoreError> {
            self.calls.lock().unwrap().push(RecordedCall {
                system_instruction,
                prompt,
                image: None,
                response_schema,
            });
            self.response.clone()
        }
    }

    const PARACETAMOL: &str = r#"{"name":"Paracetamol","uses":["pain"],"sideEffects":[],"disclaimer":"x"}"#;

    #[tokio::test]
    async fn test_identify_by_name_sends_instruction_and_schema() {
        let service = Service::new(FakeLlm::answering(Ok(PARACETAMOL)));

        let record = service
            .identify_by_name(IdentifyByNameInput {
                name: "Paracetamol".to_string(),
                prompt: "Tell me about Paracetamol".to_string(),
                language: Language::Ku,
            })
            .await;

        assert!(record.is_identified());
        assert_eq!(record.name.as_deref(), Some("Paracetamol"));

        let calls = service.llm_client().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "Tell me about Paracetamol");
        assert!(calls[0].system_instruction.contains("Kurdish (Sorani)"));
        assert_eq!(calls[0].response_schema, get_medication_schema());
        assert!(calls[0].image.is_none());
    }

    #[tokio::test]
    async fn test_identify_by_image_forwards_image() {
        let service = Service::new(FakeLlm::answering(Ok(PARACETAMOL)));
        let image = ImagePayload::from_bytes(&[0xff, 0xd8, 0xff], "image/jpeg");

        let record = service
            .identify_by_image(IdentifyByImageInput {
                image: image.clone(),
                prompt: "Identify this".to_string(),
                language: Language::En,
            })
            .await;

        assert!(record.is_identified());
        let calls = service.llm_client().calls();
        assert_eq!(calls[0].image, Some(image));
        assert!(calls[0].system_instruction.contains("**English**"));
    }

    #[tokio::test]
    async fn test_transport_error_becomes_record() {
        let service = Service::new(FakeLlm::answering(Err(CoreError::ExternalServiceError(
            "connection refused".to_string(),
        ))));

        let record = service
            .identify_by_name(IdentifyByNameInput {
                name: "Aspirin".to_string(),
                prompt: "Aspirin".to_string(),
                language: Language::En,
            })
            .await;

        assert_eq!(record.raw_text, TRANSPORT_FAILURE_TEXT);
        assert_eq!(record.name, None);
        assert_eq!(record.failure_reason(), Some(FailureReason::Transport));
    }

    #[tokio::test]
    async fn test_invalid_model_output_becomes_record() {
        let service = Service::new(FakeLlm::answering(Ok("Sorry, I can't help with that.")));

        let record = service
            .identify_by_image(IdentifyByImageInput {
                image: ImagePayload::from_bytes(b"img", "image/png"),
                prompt: "Identify".to_string(),
                language: Language::En,
            })
            .await;

        assert_eq!(record.failure_reason(), Some(FailureReason::InvalidFormat));
        assert_eq!(record.raw_text, "Sorry, I can't help with that.");
    }

    #[tokio::test]
    async fn test_identical_calls_run_concurrently() {
        let service = Service::new(FakeLlm::answering(Ok(PARACETAMOL)));
        let input = IdentifyByNameInput {
            name: "Paracetamol".to_string(),
            prompt: "Paracetamol".to_string(),
            language: Language::En,
        };

        let (a, b) = tokio::join!(
            service.identify_by_name(input.clone()),
            service.identify_by_name(input)
        );

        assert_eq!(a, b);
        assert_eq!(service.llm_client().calls().len(), 2);
    }
}
