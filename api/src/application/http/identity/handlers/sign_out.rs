use axum::{Extension, extract::State};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
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
pub struct SignOutResponse {
    pub signed_out: bool,
}

#[utoipa::path(
    post,
    path = "/sign-out",
    tag = "auth",
    summary = "Sign out",
    description = "Ends the session named by the Bearer session token. Unknown or missing tokens are ignored.",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    responses(
        (status = 200, body = SignOutResponse)
    )
)]
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Response<SignOutResponse>, ApiError> {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        if let Some(session) = state.devices.get(&device.device_id, bearer.token()).await {
            session.identity.sign_out();
        }
    }

    Ok(Response::OK(SignOutResponse { signed_out: true }))
}
