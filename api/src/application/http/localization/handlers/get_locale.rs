use std::collections::BTreeMap;

use axum::extract::{Path, State};
use kurdmed_core::domain::localization::Language;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocaleResponse {
    pub language: Language,
    /// `rtl` for Kurdish, `ltr` otherwise.
    pub direction: String,
    pub data: BTreeMap<String, String>,
}

#[utoipa::path(
    get,
    path = "/{language}",
    tag = "localization",
    summary = "Get translations",
    description = "Returns the flattened translation catalog of a language",
    params(
        ("language" = String, Path, description = "Language code (en, ku)"),
    ),
    responses(
        (status = 200, body = LocaleResponse),
        (status = 404, description = "Unknown language")
    )
)]
pub async fn get_locale(
    Path(language): Path<String>,
    State(state): State<AppState>,
) -> Result<Response<LocaleResponse>, ApiError> {
    let language: Language = language
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown language '{}'", language)))?;

    let data = state
        .translator
        .catalog(language)
        .map(|catalog| {
            catalog
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    Ok(Response::OK(LocaleResponse {
        language,
        direction: if language.is_right_to_left() { "rtl" } else { "ltr" }.to_string(),
        data,
    }))
}
