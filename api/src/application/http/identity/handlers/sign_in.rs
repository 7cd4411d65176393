use axum::{Extension, body::Bytes, extract::State};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use kurdmed_core::domain::identity::{AuthError, AuthenticatedUser, SignInCredential};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        identity::validators::SignInFailureRequest,
        server::{
            api_entities::{api_error::ApiError, response::Response},
            app_state::AppState,
        },
    },
};

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub data: AuthenticatedUser,
    /// Opaque token to send as `Authorization: Bearer` on protected routes.
    pub session_token: String,
}

fn credential_from_request(
    bearer: Option<&Bearer>,
    body: &Bytes,
) -> Result<SignInCredential, ApiError> {
    if let Some(token) = bearer.map(|b| b.token().trim()).filter(|t| !t.is_empty()) {
        return Ok(SignInCredential::GoogleIdToken(token.to_string()));
    }

    if body.is_empty() {
        return Err(ApiError::BadRequest(
            "Provide a Google ID token as Bearer authorization or a failure report".to_string(),
        ));
    }

    let failure: SignInFailureRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid sign-in body: {}", e)))?;
    failure
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(SignInCredential::ProviderFailure {
        code: failure.code,
        message: failure.message,
    })
}

#[utoipa::path(
    post,
    path = "/sign-in",
    tag = "auth",
    summary = "Sign in with Google",
    description = "Exchanges a Google ID token (Bearer) for a signed-in session on this device and returns the session token that protected routes expect as Bearer. Signing in again replaces the previous token. A JSON body with a client-side failure code is translated into the matching message.",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    request_body(content = SignInFailureRequest, description = "Client-side popup failure, sent instead of a Bearer token"),
    responses(
        (status = 200, body = SignInResponse),
        (status = 401, description = "Sign-in failed"),
        (status = 503, description = "Sign-in is not configured")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    body: Bytes,
) -> Result<Response<SignInResponse>, ApiError> {
    let bearer = bearer
        .as_ref()
        .map(|TypedHeader(Authorization(bearer))| bearer);
    let credential = credential_from_request(bearer, &body)?;
    let identity = state.devices.identity();

    match identity.sign_in(credential).await {
        Ok(user) => {
            let session = state.devices.bind(&device.device_id, identity).await;
            Ok(Response::OK(SignInResponse {
                data: user,
                session_token: session.token().to_string(),
            }))
        }
        Err(e) => {
            warn!(device_id = %device.device_id, "Sign-in failed: {}", e);
            let language = state.resolve_language(&device, None).await;
            let message = state.translate(language, e.message_key());

            Err(match e {
                AuthError::NotConfigured => ApiError::ServiceUnavailable(message),
                _ => ApiError::Unauthorized(message),
            })
        }
    }
}
