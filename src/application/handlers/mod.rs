//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod chat;

pub use chat::{
    ChatModels, SendChatMessageCommand, SendChatMessageError, SendChatMessageHandler,
    SendChatMessageResult,
};
