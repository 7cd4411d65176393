use kurdmed_core::domain::{chat::ConversationTurn, localization::Language};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::http::server::device_sessions::KurdMedChatView;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct StartChatRequest {
    pub language: Option<Language>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SendChatMessageRequest {
    #[validate(length(max = 5000, message = "message must be at most 5000 characters"))]
    pub message: String,
    pub language: Option<Language>,
}

/// Visible chat state of a device.
#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub session_id: Option<String>,
    pub language: Option<Language>,
    pub sessions_created: usize,
    pub turns: Vec<ConversationTurn>,
}

impl From<&KurdMedChatView> for ChatState {
    fn from(view: &KurdMedChatView) -> Self {
        Self {
            session_id: view.manager.session().map(|session| session.id.to_string()),
            language: view.manager.current_language(),
            sessions_created: view.manager.sessions_created(),
            turns: view.transcript.turns().to_vec(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatStateResponse {
    pub data: ChatState,
}
