use super::handlers::{
    __path_get_messages, __path_send_message, __path_start_session, get_messages, send_message,
    start_session,
};
use crate::application::{
    auth::auth, device_middleware::device_middleware, http::server::app_state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(start_session, get_messages, send_message))]
pub struct ChatApiDoc;

pub fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/chat/session", state.args.server.root_path),
            post(start_session),
        )
        .route(
            &format!("{}/chat/messages", state.args.server.root_path),
            get(get_messages).post(send_message),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth))
        .layer(middleware::from_fn(device_middleware))
}
