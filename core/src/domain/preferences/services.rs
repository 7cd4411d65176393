use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{
    common::entities::app_errors::CoreError,
    localization::Language,
    preferences::{
        entities::{
            LANGUAGE_SLOT, ONBOARDING_SLOT, PreferenceUpdate, Preferences, THEME_SLOT, Theme,
        },
        ports::PreferenceStore,
    },
};

pub struct PreferenceManager<S>
where
    S: PreferenceStore,
{
    store: Arc<S>,
}

impl<S> Clone for PreferenceManager<S>
where
    S: PreferenceStore,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> PreferenceManager<S>
where
    S: PreferenceStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stored language of a device, ignoring unparsable values.
    pub async fn stored_language(&self, device_id: &str) -> Result<Option<Language>, CoreError> {
        let stored = self
            .store
            .get(device_id.to_string(), LANGUAGE_SLOT.to_string())
            .await?;

        Ok(stored.and_then(|value| value.parse().ok()))
    }

    /// Preferences of a device. Unset or invalid slots fall back to light
    /// theme, the `Accept-Language` language and onboarding not done.
    #[instrument(skip(self))]
    pub async fn load(
        &self,
        device_id: &str,
        accept_language: Option<&str>,
    ) -> Result<Preferences, CoreError> {
        let theme = self
            .store
            .get(device_id.to_string(), THEME_SLOT.to_string())
            .await?
            .and_then(|value| value.parse::<Theme>().ok())
            .unwrap_or_default();

        let language = match self.stored_language(device_id).await? {
            Some(language) => language,
            None => accept_language
                .map(Language::from_accept_language)
                .unwrap_or_default(),
        };

        let onboarding_complete = self
            .store
            .get(device_id.to_string(), ONBOARDING_SLOT.to_string())
            .await?
            .is_some_and(|value| value == "true");

        Ok(Preferences {
            theme,
            language,
            onboarding_complete,
        })
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        device_id: &str,
        update: PreferenceUpdate,
        accept_language: Option<&str>,
    ) -> Result<Preferences, CoreError> {
        if let Some(theme) = update.theme {
            self.store
                .set(
                    device_id.to_string(),
                    THEME_SLOT.to_string(),
                    theme.to_string(),
                )
                .await?;
        }

        if let Some(language) = update.language {
            self.store
                .set(
                    device_id.to_string(),
                    LANGUAGE_SLOT.to_string(),
                    language.code().to_string(),
                )
                .await?;
        }

        match update.onboarding_complete {
            Some(true) => {
                self.store
                    .set(
                        device_id.to_string(),
                        ONBOARDING_SLOT.to_string(),
                        "true".to_string(),
                    )
                    .await?
            }
            Some(false) => {
                self.store
                    .remove(device_id.to_string(), ONBOARDING_SLOT.to_string())
                    .await?
            }
            None => {}
        }

        debug!("Preferences updated");
        self.load(device_id, accept_language).await
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        slots: Mutex<HashMap<(String, String), String>>,
    }

    impl FakeStore {
        fn with(entries: &[(&str, &str, &str)]) -> Self {
            let store = Self::default();
            for (namespace, slot, value) in entries {
                store.slots.lock().unwrap().insert(
                    (namespace.to_string(), slot.to_string()),
                    value.to_string(),
                );
            }
            store
        }
    }

    impl PreferenceStore for FakeStore {
        async fn get(&self, namespace: String, slot: String) -> Result<Option<String>, CoreError> {
            Ok(self.slots.lock().unwrap().get(&(namespace, slot)).cloned())
        }

        async fn set(&self, namespace: String, slot: String, value: String) -> Result<(), CoreError> {
            self.slots.lock().unwrap().insert((namespace, slot), value);
            Ok(())
        }

        async fn remove(&self, namespace: String, slot: String) -> Result<(), CoreError> {
            self.slots.lock().unwrap().remove(&(namespace, slot));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_stored() {
        let manager = PreferenceManager::new(Arc::new(FakeStore::default()));

        let preferences = manager.load("device-1", Some("ku-IQ,en;q=0.8")).await.unwrap();
        assert_eq!(
            preferences,
            Preferences {
                theme: Theme::Light,
                language: Language::Ku,
                onboarding_complete: false,
            }
        );

        let preferences = manager.load("device-1", None).await.unwrap();
        assert_eq!(preferences.language, Language::En);
    }

    #[tokio::test]
    async fn test_invalid_stored_values_are_ignored() {
        let store = FakeStore::with(&[
            ("device-1", THEME_SLOT, "purple"),
            ("device-1", LANGUAGE_SLOT, "fr"),
            ("device-1", ONBOARDING_SLOT, "yes"),
        ]);
        let manager = PreferenceManager::new(Arc::new(store));

        let preferences = manager.load("device-1", Some("en-US")).await.unwrap();
        assert_eq!(preferences.theme, Theme::Light);
        assert_eq!(preferences.language, Language::En);
        assert!(!preferences.onboarding_complete);
    }

    #[tokio::test]
    async fn test_stored_language_wins_over_header() {
        let store = FakeStore::with(&[("device-1", LANGUAGE_SLOT, "ku")]);
        let manager = PreferenceManager::new(Arc::new(store));

        let preferences = manager.load("device-1", Some("en-US")).await.unwrap();
        assert_eq!(preferences.language, Language::Ku);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let manager = PreferenceManager::new(Arc::new(FakeStore::default()));

        let updated = manager
            .update(
                "device-1",
                PreferenceUpdate {
                    theme: Some(Theme::Dark),
                    language: Some(Language::Ku),
                    onboarding_complete: Some(true),
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated, manager.load("device-1", None).await.unwrap());
        assert_eq!(updated.theme, Theme::Dark);
        assert!(updated.onboarding_complete);

        let other_device = manager.load("device-2", None).await.unwrap();
        assert_eq!(other_device.theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_slots() {
        let manager = PreferenceManager::new(Arc::new(FakeStore::default()));
        manager
            .update(
                "device-1",
                PreferenceUpdate {
                    theme: Some(Theme::Dark),
                    onboarding_complete: Some(true),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let updated = manager
            .update(
                "device-1",
                PreferenceUpdate {
                    onboarding_complete: Some(false),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.theme, Theme::Dark);
        assert!(!updated.onboarding_complete);
    }
}
