use axum::{Extension, extract::State};

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        chat::validators::{ChatState, ChatStateResponse},
        server::{
            api_entities::{api_error::ApiError, response::Response},
            app_state::AppState,
            device_sessions::DeviceSession,
        },
    },
};

#[utoipa::path(
    get,
    path = "/messages",
    tag = "chat",
    summary = "Get the conversation",
    description = "Returns the visible transcript. A device without a conversation gets a fresh one with the assistant greeting.",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
        ("Authorization" = String, Header, description = "Bearer session token from sign-in"),
    ),
    responses(
        (status = 200, body = ChatStateResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    Extension(session): Extension<DeviceSession>,
) -> Result<Response<ChatStateResponse>, ApiError> {
    let mut view = session.chat.lock().await;

    if view.transcript.is_empty() {
        let language = state.resolve_language(&device, None).await;
        view.reinitialize(language, state.translate(language, "aiChatbot.initialMessage"));
    }

    Ok(Response::OK(ChatStateResponse {
        data: ChatState::from(&*view),
    }))
}
