use axum::{Extension, extract::State};

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        preferences::{
            handlers::get_preferences::PreferencesResponse,
            validators::UpdatePreferencesRequest,
        },
        server::{
            api_entities::{
                api_error::{ApiError, ValidateJson},
                response::Response,
            },
            app_state::AppState,
        },
    },
};

#[utoipa::path(
    put,
    path = "",
    tag = "preferences",
    summary = "Update device preferences",
    description = "Stores the given fields; omitted fields keep their value",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, body = PreferencesResponse)
    )
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    ValidateJson(payload): ValidateJson<UpdatePreferencesRequest>,
) -> Result<Response<PreferencesResponse>, ApiError> {
    let preferences = state
        .preferences
        .update(
            &device.device_id,
            payload.into(),
            device.accept_language.as_deref(),
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(PreferencesResponse { data: preferences }))
}
