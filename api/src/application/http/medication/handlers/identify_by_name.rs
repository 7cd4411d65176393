use axum::{Extension, extract::State};
use kurdmed_core::domain::medication::{
    IdentifyByNameInput, MedicationRecord, ports::MedicationService,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        medication::validators::IdentifyByNameRequest,
        server::{
            api_entities::{
                api_error::{ApiError, ValidateJson},
                response::Response,
            },
            app_state::AppState,
        },
    },
};

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdentifyMedicationResponse {
    pub data: MedicationRecord,
}

#[utoipa::path(
    post,
    path = "/identify/name",
    tag = "medications",
    summary = "Identify a medication by name",
    description = "Asks the model for structured information about a named medication. Model failures are returned as a record whose outcome explains them.",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    request_body = IdentifyByNameRequest,
    responses(
        (status = 200, body = IdentifyMedicationResponse),
        (status = 400, description = "Empty or invalid name"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn identify_by_name(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    ValidateJson(payload): ValidateJson<IdentifyByNameRequest>,
) -> Result<Response<IdentifyMedicationResponse>, ApiError> {
    let language = state.resolve_language(&device, payload.language).await;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest(
            state.translate(language, "nameSearch.error.enterName"),
        ));
    }

    let prompt = payload.prompt.unwrap_or_else(|| {
        state
            .translator
            .translate_with(language, "nameSearch.prompt", &[("name", name.as_str())])
    });

    let record = state
        .service
        .identify_by_name(IdentifyByNameInput {
            name,
            prompt,
            language,
        })
        .await;

    Ok(Response::OK(IdentifyMedicationResponse { data: record }))
}
