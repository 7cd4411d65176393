use super::handlers::{__path_get_locale, get_locale};
use crate::application::http::server::app_state::AppState;
use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(get_locale))]
pub struct LocalizationApiDoc;

pub fn localization_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/locales/{{language}}", state.args.server.root_path),
        get(get_locale),
    )
}
