use std::sync::Arc;

use crate::domain::medication::ports::LLMClient;

/// Application service. Domain modules add their behaviour through trait impls
/// (`MedicationService`, ...) on this type.
pub struct Service<LLM>
where
    LLM: LLMClient,
{
    pub(crate) llm_client: Arc<LLM>,
}

impl<LLM> Clone for Service<LLM>
where
    LLM: LLMClient,
{
    fn clone(&self) -> Self {
        Self {
            llm_client: self.llm_client.clone(),
        }
    }
}

impl<LLM> Service<LLM>
where
    LLM: LLMClient,
{
    pub fn new(llm_client: LLM) -> Self {
        Self {
            llm_client: Arc::new(llm_client),
        }
    }

    pub fn llm_client(&self) -> Arc<LLM> {
        self.llm_client.clone()
    }
}
