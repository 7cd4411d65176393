use std::path::Path;

use crate::{
    domain::{common::entities::app_errors::CoreError, preferences::ports::PreferenceStore},
    infrastructure::preferences::json_file_store::{
        InMemoryPreferenceStore, JsonFilePreferenceStore,
    },
};

/// Store selected at startup from configuration.
#[derive(Debug)]
pub enum PreferenceBackend {
    File(JsonFilePreferenceStore),
    Memory(InMemoryPreferenceStore),
}

impl PreferenceBackend {
    pub async fn from_path(path: Option<&Path>) -> Result<Self, CoreError> {
        match path {
            Some(path) => Ok(Self::File(JsonFilePreferenceStore::open(path).await?)),
            None => Ok(Self::Memory(InMemoryPreferenceStore::default())),
        }
    }
}

impl PreferenceStore for PreferenceBackend {
    async fn get(&self, namespace: String, slot: String) -> Result<Option<String>, CoreError> {
        match self {
            Self::File(store) => store.get(namespace, slot).await,
            Self::Memory(store) => store.get(namespace, slot).await,
        }
    }

    async fn set(&self, namespace: String, slot: String, value: String) -> Result<(), CoreError> {
        match self {
            Self::File(store) => store.set(namespace, slot, value).await,
            Self::Memory(store) => store.set(namespace, slot, value).await,
        }
    }

    async fn remove(&self, namespace: String, slot: String) -> Result<(), CoreError> {
        match self {
            Self::File(store) => store.remove(namespace, slot).await,
            Self::Memory(store) => store.remove(namespace, slot).await,
        }
    }
}
