//! Application services for conversations and message logs.

mod directory;
mod error;
mod message_log;

pub use directory::ConversationDirectory;
pub use error::{MessagingServiceError, MessagingServiceResult};
pub use message_log::{MessageLogService, MessageTarget, SendMessageRequest, SentMessage};
