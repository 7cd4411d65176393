use axum::{
    extract::Request,
    http::header::ACCEPT_LANGUAGE,
    middleware::Next,
    response::Response,
};

use crate::application::http::server::api_entities::api_error::ApiError;

pub const DEVICE_ID_HEADER: &str = "x-device-id";
const MAX_DEVICE_ID_LENGTH: usize = 128;

/// Device context stored in request extensions
#[derive(Clone, Debug)]
pub struct DeviceContext {
    pub device_id: String,
    pub accept_language: Option<String>,
}

/// Reads `X-Device-Id` and `Accept-Language` into a [`DeviceContext`].
pub async fn device_middleware(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let device_id = req
        .headers()
        .get(DEVICE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing X-Device-Id header".to_string()))?;

    if device_id.len() > MAX_DEVICE_ID_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "X-Device-Id must be at most {} characters",
            MAX_DEVICE_ID_LENGTH
        )));
    }

    let accept_language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    req.extensions_mut().insert(DeviceContext {
        device_id,
        accept_language,
    });

    Ok(next.run(req).await)
}
