use std::sync::Arc;

use kurdmed_core::{
    application::{KurdMedPreferences, KurdMedService},
    domain::localization::{Language, Translator},
    infrastructure::identity::FirebaseIdentityProvider,
};
use tracing::warn;

use crate::{
    application::{
        device_middleware::DeviceContext, http::server::device_sessions::DeviceSessions,
    },
    args::Args,
};

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: KurdMedService,
    pub translator: Arc<Translator>,
    pub preferences: KurdMedPreferences,
    pub devices: DeviceSessions,
}

impl AppState {
    pub fn new(
        args: Arc<Args>,
        service: KurdMedService,
        translator: Translator,
        preferences: KurdMedPreferences,
        identity_provider: FirebaseIdentityProvider,
    ) -> Self {
        let devices = DeviceSessions::new(
            Arc::new(identity_provider),
            service.llm_client(),
            args.identity.session_limits(),
        );

        Self {
            args,
            service,
            translator: Arc::new(translator),
            preferences,
            devices,
        }
    }

    /// Explicit choice, then the device preference, then `Accept-Language`.
    pub async fn resolve_language(
        &self,
        device: &DeviceContext,
        explicit: Option<Language>,
    ) -> Language {
        if let Some(language) = explicit {
            return language;
        }

        match self.preferences.stored_language(&device.device_id).await {
            Ok(Some(language)) => return language,
            Ok(None) => {}
            Err(e) => warn!(device_id = %device.device_id, "Failed to read language preference: {}", e),
        }

        device
            .accept_language
            .as_deref()
            .map(Language::from_accept_language)
            .unwrap_or_default()
    }

    pub fn translate(&self, language: Language, key: &str) -> String {
        self.translator.translate(language, key)
    }
}
