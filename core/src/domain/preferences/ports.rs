use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// String slots grouped by namespace (one namespace per device).
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    fn get(
        &self,
        namespace: String,
        slot: String,
    ) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    fn set(
        &self,
        namespace: String,
        slot: String,
        value: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn remove(
        &self,
        namespace: String,
        slot: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
