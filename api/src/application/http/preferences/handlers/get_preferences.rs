use axum::{Extension, extract::State};
use kurdmed_core::domain::preferences::Preferences;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    device_middleware::DeviceContext,
    http::server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PreferencesResponse {
    pub data: Preferences,
}

#[utoipa::path(
    get,
    path = "",
    tag = "preferences",
    summary = "Get device preferences",
    description = "Theme, language and onboarding state of this device, with defaults for unset values",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    responses(
        (status = 200, body = PreferencesResponse)
    )
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
) -> Result<Response<PreferencesResponse>, ApiError> {
    let preferences = state
        .preferences
        .load(&device.device_id, device.accept_language.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(PreferencesResponse { data: preferences }))
}
