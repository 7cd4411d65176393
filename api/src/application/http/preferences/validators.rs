use kurdmed_core::domain::{
    localization::Language,
    preferences::{PreferenceUpdate, Theme},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub onboarding_complete: Option<bool>,
}

impl From<UpdatePreferencesRequest> for PreferenceUpdate {
    fn from(request: UpdatePreferencesRequest) -> Self {
        Self {
            theme: request.theme,
            language: request.language,
            onboarding_complete: request.onboarding_complete,
        }
    }
}
