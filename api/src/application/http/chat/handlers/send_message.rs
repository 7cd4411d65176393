use std::convert::Infallible;

use axum::{
    Extension,
    extract::State,
    response::sse::{Event, KeepAlive, KeepAliveStream, Sse},
};
use futures::{
    StreamExt,
    stream::{self, BoxStream},
};
use kurdmed_core::domain::chat::{ReplyEvent, reply_events};

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        chat::validators::SendChatMessageRequest,
        server::{
            api_entities::api_error::{ApiError, ValidateJson},
            app_state::AppState,
            device_sessions::DeviceSession,
        },
    },
};

type EventStream = BoxStream<'static, Result<Event, Infallible>>;

fn to_sse(event: ReplyEvent) -> Result<Event, Infallible> {
    Ok(match event {
        ReplyEvent::Delta(text) => Event::default().event("delta").data(text),
        ReplyEvent::Done => Event::default().event("done").data(""),
        ReplyEvent::Failed(message) => Event::default().event("error").data(message),
    })
}

#[utoipa::path(
    post,
    path = "/messages",
    tag = "chat",
    summary = "Send a chat message",
    description = "Streams the reply as server-sent events: `delta` events carry the reply accumulated so far, then `done`. A failed reply ends with one `error` event carrying the localized message.",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
        ("Authorization" = String, Header, description = "Bearer session token from sign-in"),
    ),
    request_body = SendChatMessageRequest,
    responses(
        (status = 200, content_type = "text/event-stream", description = "Reply stream"),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    Extension(session): Extension<DeviceSession>,
    ValidateJson(payload): ValidateJson<SendChatMessageRequest>,
) -> Result<Sse<KeepAliveStream<EventStream>>, ApiError> {
    let language = state.resolve_language(&device, payload.language).await;

    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest(
            state.translate(language, "aiChatbot.error.emptyMessage"),
        ));
    }

    let mut view = session.chat.lock_owned().await;

    if view.transcript.is_empty() {
        view.reinitialize(language, state.translate(language, "aiChatbot.initialMessage"));
    }

    let error_message = state.translate(language, "aiChatbot.errorMessage");

    let opened = view.send(message, language).await;
    let events: EventStream = match opened {
        Ok(fragments) => reply_events(view, fragments, error_message)
            .map(to_sse)
            .boxed(),
        Err(_) => {
            view.recover_from_failure(error_message.clone());
            stream::once(async move { to_sse(ReplyEvent::Failed(error_message)) }).boxed()
        }
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
