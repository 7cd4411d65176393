use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::domain::{
    common::entities::app_errors::CoreError, preferences::ports::PreferenceStore,
};

type Slots = BTreeMap<String, BTreeMap<String, String>>;

/// Preferences persisted as one JSON document: `{ namespace: { slot: value } }`.
///
/// The whole document is cached; every write rewrites the file through a
/// temporary sibling and a rename. The cache only takes a change once the
/// file holds it.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    slots: RwLock<Slots>,
}

impl JsonFilePreferenceStore {
    #[instrument]
    pub async fn open(path: &Path) -> Result<Self, CoreError> {
        let slots = match tokio::fs::read_to_string(path).await {
            Ok(source) => serde_json::from_str(&source).map_err(|e| {
                CoreError::StorageError(format!("failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Slots::new(),
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        info!(path = %path.display(), "Preference store opened");

        Ok(Self {
            path: path.to_path_buf(),
            slots: RwLock::new(slots),
        })
    }

    async fn persist(&self, slots: &Slots) -> Result<(), CoreError> {
        let document = serde_json::to_vec_pretty(slots)
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::StorageError(e.to_string()))?;
        }

        let temporary = self.path.with_extension("json.tmp");
        tokio::fs::write(&temporary, document).await.map_err(|e| {
            error!(path = %temporary.display(), "Failed to write preferences: {}", e);
            CoreError::StorageError(e.to_string())
        })?;
        tokio::fs::rename(&temporary, &self.path)
            .await
            .map_err(|e| {
                error!(path = %self.path.display(), "Failed to replace preferences: {}", e);
                CoreError::StorageError(e.to_string())
            })
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    async fn get(&self, namespace: String, slot: String) -> Result<Option<String>, CoreError> {
        let slots = self.slots.read().await;

        Ok(slots
            .get(&namespace)
            .and_then(|namespace| namespace.get(&slot))
            .cloned())
    }

    async fn set(&self, namespace: String, slot: String, value: String) -> Result<(), CoreError> {
        let mut slots = self.slots.write().await;

        let mut updated = slots.clone();
        updated.entry(namespace).or_default().insert(slot, value);

        self.persist(&updated).await?;
        *slots = updated;
        Ok(())
    }

    async fn remove(&self, namespace: String, slot: String) -> Result<(), CoreError> {
        let mut slots = self.slots.write().await;

        if !slots
            .get(&namespace)
            .is_some_and(|entries| entries.contains_key(&slot))
        {
            return Ok(());
        }

        let mut updated = slots.clone();
        if let Some(entries) = updated.get_mut(&namespace) {
            entries.remove(&slot);
            if entries.is_empty() {
                updated.remove(&namespace);
            }
        }

        self.persist(&updated).await?;
        *slots = updated;
        Ok(())
    }
}

/// Process-lifetime store used when no preference file is configured.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    slots: RwLock<HashMap<(String, String), String>>,
}

impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, namespace: String, slot: String) -> Result<Option<String>, CoreError> {
        Ok(self.slots.read().await.get(&(namespace, slot)).cloned())
    }

    async fn set(&self, namespace: String, slot: String, value: String) -> Result<(), CoreError> {
        self.slots.write().await.insert((namespace, slot), value);
        Ok(())
    }

    async fn remove(&self, namespace: String, slot: String) -> Result<(), CoreError> {
        self.slots.write().await.remove(&(namespace, slot));
        Ok(())
    }
}
