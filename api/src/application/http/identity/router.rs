use super::handlers::{
    __path_current_user, __path_sign_in, __path_sign_out, current_user, sign_in, sign_out,
};
use crate::application::{device_middleware::device_middleware, http::server::app_state::AppState};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(sign_in, sign_out, current_user))]
pub struct IdentityApiDoc;

pub fn identity_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/auth/sign-in", state.args.server.root_path),
            post(sign_in),
        )
        .route(
            &format!("{}/auth/sign-out", state.args.server.root_path),
            post(sign_out),
        )
        .route(
            &format!("{}/auth/me", state.args.server.root_path),
            get(current_user),
        )
        .layer(middleware::from_fn(device_middleware))
}
