use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::{generate_timestamp, generate_uuid_v7},
    localization::Language,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One visible message of the chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversationTurn {
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        let (now, _) = generate_timestamp();

        Self {
            sender,
            text: text.into(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A message as the model sees it when the conversation is continued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContent {
    pub role: ChatRole,
    pub text: String,
}

impl ChatContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Conversation with the model, bound to the language it was opened for.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    pub language: Language,
    pub system_instruction: String,
    pub(crate) history: Arc<Mutex<Vec<ChatContent>>>,
}

impl ChatSession {
    pub fn new(language: Language, system_instruction: String) -> Self {
        Self {
            id: generate_uuid_v7(),
            language,
            system_instruction,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn history(&self) -> Vec<ChatContent> {
        self.history.lock().await.clone()
    }
}

/// Ordered log of turns shown to the user.
///
/// Only the trailing assistant turn is ever rewritten, and only while a reply
/// is streaming in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatTranscript {
    turns: Vec<ConversationTurn>,
}

impl ChatTranscript {
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Clears the log and seeds it with the assistant greeting.
    pub fn reset(&mut self, greeting: impl Into<String>) {
        self.turns.clear();
        self.turns
            .push(ConversationTurn::new(Sender::Assistant, greeting));
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(Sender::User, text));
    }

    /// Opens the empty assistant turn that a streamed reply fills in.
    pub fn begin_assistant(&mut self) {
        self.turns
            .push(ConversationTurn::new(Sender::Assistant, String::new()));
    }

    pub fn update_last(&mut self, text: impl Into<String>) {
        if let Some(turn) = self
            .turns
            .last_mut()
            .filter(|turn| turn.sender == Sender::Assistant)
        {
            turn.text = text.into();
        }
    }

    /// Drops an empty trailing assistant turn, then appends the error turn.
    pub fn recover_from_failure(&mut self, error_message: impl Into<String>) {
        if self
            .turns
            .last()
            .is_some_and(|turn| turn.sender == Sender::Assistant && turn.text.is_empty())
        {
            self.turns.pop();
        }
        self.turns
            .push(ConversationTurn::new(Sender::Assistant, error_message));
    }
}
