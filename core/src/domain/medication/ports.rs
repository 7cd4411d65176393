use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    medication::{
        entities::MedicationRecord,
        value_objects::{IdentifyByImageInput, IdentifyByNameInput, ImagePayload},
    },
};

/// LLM Client trait for one-shot, schema-constrained model calls
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    fn generate_with_image(
        &self,
        system_instruction: String,
        prompt: String,
        image: ImagePayload,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn generate_with_text(
        &self,
        system_instruction: String,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for medication identification.
///
/// Both operations are total: every failure (transport, format, unrecognized
/// medication) comes back as a [`MedicationRecord`] describing it.
pub trait MedicationService: Send + Sync {
    fn identify_by_image(
        &self,
        input: IdentifyByImageInput,
    ) -> impl Future<Output = MedicationRecord> + Send;

    fn identify_by_name(
        &self,
        input: IdentifyByNameInput,
    ) -> impl Future<Output = MedicationRecord> + Send;
}
