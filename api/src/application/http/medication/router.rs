use super::{
    handlers::{__path_identify_by_image, __path_identify_by_name, identify_by_image, identify_by_name},
    validators::MAX_IMAGE_SIZE,
};
use crate::application::{
    auth::auth, device_middleware::device_middleware, http::server::app_state::AppState,
};
use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(identify_by_image, identify_by_name))]
pub struct MedicationApiDoc;

pub fn medication_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/medications/identify/image", state.args.server.root_path),
            post(identify_by_image),
        )
        .route(
            &format!("{}/medications/identify/name", state.args.server.root_path),
            post(identify_by_name),
        )
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
        .layer(middleware::from_fn_with_state(state.clone(), auth))
        .layer(middleware::from_fn(device_middleware))
}
