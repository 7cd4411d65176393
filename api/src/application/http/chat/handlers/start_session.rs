use axum::{Extension, extract::State};

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        chat::validators::{ChatState, ChatStateResponse, StartChatRequest},
        server::{
            api_entities::{
                api_error::{ApiError, ValidateJson},
                response::Response,
            },
            app_state::AppState,
            device_sessions::DeviceSession,
        },
    },
};

#[utoipa::path(
    post,
    path = "/session",
    tag = "chat",
    summary = "Start a new conversation",
    description = "Clears the transcript, seeds the assistant greeting and opens a fresh model session",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
        ("Authorization" = String, Header, description = "Bearer session token from sign-in"),
    ),
    request_body = StartChatRequest,
    responses(
        (status = 201, body = ChatStateResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn start_session(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    Extension(session): Extension<DeviceSession>,
    ValidateJson(payload): ValidateJson<StartChatRequest>,
) -> Result<Response<ChatStateResponse>, ApiError> {
    let language = state.resolve_language(&device, payload.language).await;
    let mut view = session.chat.lock().await;
    view.reinitialize(language, state.translate(language, "aiChatbot.initialMessage"));

    Ok(Response::Created(ChatStateResponse {
        data: ChatState::from(&*view),
    }))
}
