use std::{marker::PhantomData, ops::DerefMut, sync::Arc};

use futures::{
    StreamExt,
    future,
    stream::{self, BoxStream},
};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::domain::{
    chat::{
        entities::{ChatContent, ChatSession, ChatTranscript},
        ports::{ChatModel, FragmentStream},
    },
    common::entities::app_errors::CoreError,
    localization::Language,
    medication::{prompts::system_instruction, value_objects::IdentificationMode},
};

/// Owns the single conversation of one chat view.
///
/// States: no session, or one session for a language. A send in another
/// language replaces the session; history is not carried over.
pub struct ChatSessionManager<M>
where
    M: ChatModel,
{
    model: Arc<M>,
    session: Option<ChatSession>,
    sessions_created: usize,
}

impl<M> ChatSessionManager<M>
where
    M: ChatModel,
{
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            session: None,
            sessions_created: 0,
        }
    }

    /// Opens a fresh session for `language`, discarding any current one.
    pub fn start_session(&mut self, language: Language) -> &ChatSession {
        let session = ChatSession::new(
            language,
            system_instruction(language, IdentificationMode::Chatbot),
        );
        info!(session_id = %session.id, language = %language, "Chat session started");

        self.sessions_created += 1;
        self.session.insert(session)
    }

    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    pub fn current_language(&self) -> Option<Language> {
        self.session.as_ref().map(|session| session.language)
    }

    pub fn sessions_created(&self) -> usize {
        self.sessions_created
    }

    fn session_for(&mut self, language: Language) -> ChatSession {
        match &self.session {
            Some(session) if session.language == language => session.clone(),
            _ => self.start_session(language).clone(),
        }
    }

    /// Sends `message` in the session for `language` and returns the raw
    /// reply fragments. The exchange joins the session history once the
    /// stream has completed without error.
    #[instrument(skip(self, message))]
    pub async fn send(
        &mut self,
        message: String,
        language: Language,
    ) -> Result<FragmentStream, CoreError> {
        let session = self.session_for(language);
        let history = session.history().await;

        let fragments = self
            .model
            .stream_message(session.system_instruction.clone(), history, message.clone())
            .await
            .map_err(|e| {
                error!(session_id = %session.id, "Failed to open chat stream: {}", e);
                e
            })?;

        Ok(record_on_completion(fragments, session.history, message))
    }
}

struct Recording {
    fragments: FragmentStream,
    reply: String,
    pending: Option<(Arc<Mutex<Vec<ChatContent>>>, String)>,
}

fn record_on_completion(
    fragments: FragmentStream,
    history: Arc<Mutex<Vec<ChatContent>>>,
    message: String,
) -> FragmentStream {
    let state = Recording {
        fragments,
        reply: String::new(),
        pending: Some((history, message)),
    };

    stream::unfold(state, |mut state| async move {
        match state.fragments.next().await {
            Some(Ok(fragment)) => {
                state.reply.push_str(&fragment);
                Some((Ok(fragment), state))
            }
            Some(Err(e)) => {
                state.pending = None;
                Some((Err(e), state))
            }
            None => {
                if let Some((history, message)) = state.pending.take() {
                    let mut history = history.lock().await;
                    history.push(ChatContent::user(message));
                    history.push(ChatContent::model(std::mem::take(&mut state.reply)));
                }
                None
            }
        }
    })
    .boxed()
}

/// Running concatenation of `fragments`: yields every intermediate value.
pub fn accumulate(fragments: FragmentStream) -> BoxStream<'static, Result<String, CoreError>> {
    fragments
        .scan(String::new(), |accumulated, fragment| {
            let item = fragment.map(|fragment| {
                accumulated.push_str(&fragment);
                accumulated.clone()
            });
            future::ready(Some(item))
        })
        .boxed()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyEvent {
    /// Accumulated reply text so far.
    Delta(String),
    Done,
    /// Localized message shown in place of the reply.
    Failed(String),
}

/// Chat view state: the session manager plus the visible transcript.
pub struct ChatView<M>
where
    M: ChatModel,
{
    pub manager: ChatSessionManager<M>,
    pub transcript: ChatTranscript,
}

impl<M> ChatView<M>
where
    M: ChatModel + 'static,
{
    pub fn new(model: Arc<M>) -> Self {
        Self {
            manager: ChatSessionManager::new(model),
            transcript: ChatTranscript::default(),
        }
    }

    /// Clears the transcript, seeds the greeting and opens a session.
    pub fn reinitialize(&mut self, language: Language, greeting: impl Into<String>) {
        self.transcript.reset(greeting);
        self.manager.start_session(language);
    }

    /// Appends the user turn and an empty assistant turn, then opens the reply.
    pub async fn send(
        &mut self,
        message: String,
        language: Language,
    ) -> Result<FragmentStream, CoreError> {
        self.transcript.push_user(message.clone());
        self.transcript.begin_assistant();
        self.manager.send(message, language).await
    }

    pub fn recover_from_failure(&mut self, error_message: impl Into<String>) {
        self.transcript.recover_from_failure(error_message);
    }
}

struct ReplyDriver<G, M>
where
    G: DerefMut<Target = ChatView<M>>,
    M: ChatModel + 'static,
{
    view: Option<G>,
    replies: BoxStream<'static, Result<String, CoreError>>,
    error_message: String,
    model: PhantomData<fn() -> M>,
}

impl<G, M> Drop for ReplyDriver<G, M>
where
    G: DerefMut<Target = ChatView<M>>,
    M: ChatModel + 'static,
{
    fn drop(&mut self) {
        if let Some(mut view) = self.view.take() {
            warn!("Chat reply abandoned before completion");
            view.recover_from_failure(std::mem::take(&mut self.error_message));
        }
    }
}

/// Drives a reply into the transcript held by `view`, yielding what the
/// client should display. The view stays borrowed until the stream ends.
/// Dropping the stream early closes the reply with `error_message`.
pub fn reply_events<G, M>(
    view: G,
    fragments: FragmentStream,
    error_message: String,
) -> BoxStream<'static, ReplyEvent>
where
    G: DerefMut<Target = ChatView<M>> + Send + 'static,
    M: ChatModel + 'static,
{
    let driver = ReplyDriver {
        view: Some(view),
        replies: accumulate(fragments),
        error_message,
        model: PhantomData,
    };

    stream::unfold(driver, |mut driver| async move {
        driver.view.as_ref()?;
        let next = driver.replies.next().await;
        let view = driver.view.as_mut()?;

        let event = match next {
            Some(Ok(text)) => {
                view.transcript.update_last(text.clone());
                ReplyEvent::Delta(text)
            }
            Some(Err(e)) => {
                error!("Chat stream failed: {}", e);
                view.recover_from_failure(driver.error_message.clone());
                driver.view = None;
                ReplyEvent::Failed(driver.error_message.clone())
            }
            None => {
                driver.view = None;
                ReplyEvent::Done
            }
        };

        Some((event, driver))
    })
    .boxed()
}
