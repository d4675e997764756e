//! Chat handlers.

mod function_executor;
mod send_chat_message;
mod user_locks;

pub use function_executor::ConciergeFunctionExecutor;
pub use send_chat_message::{
    ChatModels, SendChatMessageCommand, SendChatMessageError, SendChatMessageHandler,
    SendChatMessageResult,
};
pub use user_locks::{UserLockGuard, UserLocks};
