//! Chat history.
//!
//! Messages use the chat-completions JSON shape both on the wire and in the
//! persisted blob, so a stored history can be replayed to the model as is.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A function invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function the model wants to run.
    pub name: String,
    /// Raw JSON-encoded arguments, exactly as the model produced them.
    pub arguments: String,
}

impl FunctionCall {
    /// Creates a new function call.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// One entry in a conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    /// Instructions for the model. Synthesized per request, never persisted.
    System { content: String },
    /// Text typed by the guest.
    User {
        #[serde(default)]
        content: String,
    },
    /// Model output: text, a function call request, or both.
    Assistant {
        #[serde(default)]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        function_call: Option<FunctionCall>,
    },
    /// Serialized result of a function the model asked for.
    Function { name: String, content: String },
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System {
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User {
            content: content.into(),
        }
    }

    /// Creates a plain-text assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage::Assistant {
            content: Some(content.into()),
            function_call: None,
        }
    }

    /// Creates an assistant message that requests a function call.
    pub fn assistant_function_call(content: Option<String>, call: FunctionCall) -> Self {
        ChatMessage::Assistant {
            content,
            function_call: Some(call),
        }
    }

    /// Creates a function result message.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        ChatMessage::Function {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Returns the role name as it appears on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System { .. } => "system",
            ChatMessage::User { .. } => "user",
            ChatMessage::Assistant { .. } => "assistant",
            ChatMessage::Function { .. } => "function",
        }
    }

    /// Returns the text content, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            ChatMessage::System { content }
            | ChatMessage::User { content }
            | ChatMessage::Function { content, .. } => Some(content),
            ChatMessage::Assistant { content, .. } => content.as_deref(),
        }
    }
}

/// A guest's full chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub user_id: UserId,
    pub messages: Vec<ChatMessage>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    /// Creates an empty conversation for a guest.
    pub fn empty(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Encodes a message sequence as the persisted text blob.
    pub fn encode_messages(messages: &[ChatMessage]) -> Result<String, serde_json::Error> {
        serde_json::to_string(messages)
    }

    /// Decodes a persisted text blob back into messages.
    pub fn decode_messages(blob: &str) -> Result<Vec<ChatMessage>, serde_json::Error> {
        serde_json::from_str(blob)
    }
}
