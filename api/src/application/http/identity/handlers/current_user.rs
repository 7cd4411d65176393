use axum::{Extension, extract::State};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use kurdmed_core::domain::identity::AuthenticatedUser;
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
pub struct CurrentUserResponse {
    pub data: Option<AuthenticatedUser>,
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    summary = "Current user",
    description = "Returns the user signed in under the Bearer session token, or null",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    responses(
        (status = 200, body = CurrentUserResponse)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Response<CurrentUserResponse>, ApiError> {
    let session = match bearer {
        Some(TypedHeader(Authorization(bearer))) => {
            state.devices.get(&device.device_id, bearer.token()).await
        }
        None => None,
    };

    Ok(Response::OK(CurrentUserResponse {
        data: session.and_then(|session| session.identity.current_user()),
    }))
}
