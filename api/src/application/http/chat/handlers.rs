pub mod get_messages;
pub mod send_message;
pub mod start_session;

pub use get_messages::{__path_get_messages, get_messages};
pub use send_message::{__path_send_message, send_message};
pub use start_session::{__path_start_session, start_session};
