use std::future::Future;

use futures::stream::BoxStream;

use crate::domain::{chat::entities::ChatContent, common::entities::app_errors::CoreError};

/// Lazy, finite sequence of reply fragments. Consumed once.
pub type FragmentStream = BoxStream<'static, Result<String, CoreError>>;

#[cfg_attr(test, mockall::automock)]
pub trait ChatModel: Send + Sync {
    /// Opens a streamed reply to `message`, continuing `history`.
    fn stream_message(
        &self,
        system_instruction: String,
        history: Vec<ChatContent>,
        message: String,
    ) -> impl Future<Output = Result<FragmentStream, CoreError>> + Send;
}
