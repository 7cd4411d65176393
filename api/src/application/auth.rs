use axum::{
    RequestPartsExt,
    extract::{Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{device_middleware::DeviceContext, http::server::app_state::AppState};

#[derive(Debug, Error, Deserialize, Serialize, PartialEq, Eq)]
pub enum AuthError {
    #[error("Device not identified")]
    DeviceNotIdentified,
    #[error("Token not found")]
    TokenNotFound,
    #[error("Not signed in")]
    NotSignedIn(String),
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    code: String,
    message: String,
    status: i64,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let message = match self {
            AuthError::DeviceNotIdentified => "Device not identified".to_string(),
            AuthError::TokenNotFound => "Token not found".to_string(),
            AuthError::NotSignedIn(message) => message,
        };

        let error_response = ErrorResponse {
            code: "E_UNAUTHORIZED".to_string(),
            message,
            status: status.as_u16() as i64,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

pub async fn extract_token_from_bearer(parts: &mut Parts) -> Result<String, AuthError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AuthError::TokenNotFound)?;

    Ok(bearer.token().to_string())
}

/// Lets the request through only when the bearer token is the session token
/// handed out at sign-in for this device. The session and its user are then
/// available as `DeviceSession` and `AuthenticatedUser` extensions.
/// Must run after `device_middleware`.
pub async fn auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = req.into_parts();

    let device = parts
        .extensions
        .get::<DeviceContext>()
        .cloned()
        .ok_or(AuthError::DeviceNotIdentified)?;

    let session = match extract_token_from_bearer(&mut parts).await {
        Ok(token) => state.devices.get(&device.device_id, &token).await,
        Err(_) => None,
    };

    let Some((session, user)) = session
        .and_then(|session| session.identity.current_user().map(|user| (session, user)))
    else {
        debug!(device_id = %device.device_id, "Rejected request without a valid session");
        let language = state.resolve_language(&device, None).await;
        return Err(AuthError::NotSignedIn(
            state.translate(language, "auth.error.notSignedIn"),
        ));
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
