use tracing::info;

use crate::{
    domain::{
        common::{KurdMedConfig, StorageConfig, services::Service},
        localization::Translator,
        preferences::PreferenceManager,
    },
    infrastructure::{
        identity::FirebaseIdentityProvider, llm::GeminiLLMClient,
        localization::load_translations, preferences::PreferenceBackend,
    },
};

pub type KurdMedService = Service<GeminiLLMClient>;
pub type KurdMedPreferences = PreferenceManager<PreferenceBackend>;

pub async fn create_service(config: KurdMedConfig) -> Result<KurdMedService, anyhow::Error> {
    if config.llm.gemini_api_key.trim().is_empty() {
        tracing::warn!("Gemini API key is not set; identification requests will fail");
    }

    let llm_client = GeminiLLMClient::from_config(&config.llm);
    info!(model = %config.llm.gemini_model, "Gemini client ready");

    Ok(Service::new(llm_client))
}

pub fn create_identity_provider(config: &KurdMedConfig) -> FirebaseIdentityProvider {
    let provider = FirebaseIdentityProvider::from_config(&config.identity);
    if !provider.is_configured() {
        tracing::warn!("Firebase API key is not set; sign-in is disabled");
    }

    provider
}

pub async fn create_translator(config: &StorageConfig) -> Result<Translator, anyhow::Error> {
    match &config.locales_dir {
        Some(dir) => Ok(load_translations(dir).await?),
        None => Ok(Translator::bundled()),
    }
}

pub async fn create_preferences(
    config: &StorageConfig,
) -> Result<KurdMedPreferences, anyhow::Error> {
    let backend = PreferenceBackend::from_path(config.preferences_path.as_deref()).await?;

    Ok(PreferenceManager::new(std::sync::Arc::new(backend)))
}
