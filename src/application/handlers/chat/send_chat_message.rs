//! SendChatMessage command handler.
//!
//! One chat turn: load the guest and their history, let the planning model
//! answer or pick a function, run the function, let the synthesis model
//! phrase the result, then persist the whole history.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::concierge::{
    function_definitions, system_prompt, ChatMessage, ConciergeFunction, FunctionCallError,
    FunctionName,
};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, ConversationRepository, FunctionCallMode,
    RequestMetadata, RoomService, TokenUsage, UserRepository,
};

use super::function_executor::ConciergeFunctionExecutor;
use super::user_locks::UserLocks;

/// Command to send one guest message.
#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub user_id: UserId,
    pub message: String,
}

impl SendChatMessageCommand {
    pub fn new(user_id: UserId, message: impl Into<String>) -> Self {
        Self {
            user_id,
            message: message.into(),
        }
    }
}

/// Result of a chat turn.
#[derive(Debug, Clone)]
pub struct SendChatMessageResult {
    /// Text shown to the guest; empty if the model produced none.
    pub reply: String,
    /// Function run during the turn, if any.
    pub function_invoked: Option<FunctionName>,
    /// Tokens spent across both model calls.
    pub usage: TokenUsage,
}

/// Errors that can occur during a chat turn.
#[derive(Debug, Error)]
pub enum SendChatMessageError {
    /// Store failure, including unreadable history.
    #[error("Repository error: {0}")]
    Repository(#[from] DomainError),

    /// Model provider failure.
    #[error("AI provider error: {0}")]
    AIProvider(#[from] AIError),

    /// The model asked for a function we cannot run.
    #[error("Function call error: {0}")]
    FunctionCall(#[from] FunctionCallError),

    /// Prompt or function result could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SendChatMessageError {
    fn from(err: serde_json::Error) -> Self {
        SendChatMessageError::Serialization(err.to_string())
    }
}

/// Models used for the two calls of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatModels {
    /// Sees the function declarations and decides whether to call one.
    pub planning: String,
    /// Writes the reply once a function result is in the history.
    pub synthesis: String,
}

impl ChatModels {
    pub fn new(planning: impl Into<String>, synthesis: impl Into<String>) -> Self {
        Self {
            planning: planning.into(),
            synthesis: synthesis.into(),
        }
    }
}

impl Default for ChatModels {
    fn default() -> Self {
        Self::new("gpt-3.5-turbo", "gpt-4")
    }
}

/// Handler for SendChatMessage commands.
pub struct SendChatMessageHandler {
    ai_provider: Arc<dyn AIProvider>,
    users: Arc<dyn UserRepository>,
    conversations: Arc<dyn ConversationRepository>,
    executor: ConciergeFunctionExecutor,
    models: ChatModels,
    locks: UserLocks,
}

impl SendChatMessageHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        users: Arc<dyn UserRepository>,
        conversations: Arc<dyn ConversationRepository>,
        rooms: Arc<dyn RoomService>,
        models: ChatModels,
    ) -> Self {
        Self {
            ai_provider,
            users,
            conversations,
            executor: ConciergeFunctionExecutor::new(rooms),
            models,
            locks: UserLocks::new(),
        }
    }

    /// Runs one chat turn.
    ///
    /// Turns for the same guest run one at a time. Nothing is written to the
    /// conversation unless the whole turn succeeds; the guest's
    /// `last_interaction` is updated either way.
    ///
    /// # Errors
    ///
    /// - `Repository` if loading or saving the guest or history fails
    /// - `AIProvider` if either model call fails
    /// - `FunctionCall` if the model names an unknown function or sends bad arguments
    pub async fn handle(
        &self,
        cmd: SendChatMessageCommand,
    ) -> Result<SendChatMessageResult, SendChatMessageError> {
        let _turn = self.locks.acquire(&cmd.user_id).await;
        let trace_id = Uuid::new_v4().to_string();

        // 1. Load guest and history
        let mut user = self.users.get_or_create(&cmd.user_id).await?;
        let at = user.touch(Timestamp::now());
        self.users.touch(&cmd.user_id, at).await?;

        let conversation = self.conversations.get_or_create(&cmd.user_id).await?;
        let mut messages = conversation.messages;
        messages.push(ChatMessage::user(cmd.message));

        let prompt = system_prompt(&user)?;
        let metadata = RequestMetadata::new(cmd.user_id.clone(), trace_id);

        tracing::debug!(
            user_id = %cmd.user_id,
            trace_id = %metadata.trace_id,
            history_len = messages.len(),
            prompt_tokens_estimate = self.ai_provider.estimate_tokens(&prompt),
            "Planning call"
        );

        // 2. Planning call with the function declarations
        let planning = CompletionRequest::new(metadata.clone())
            .with_model(&self.models.planning)
            .with_system_prompt(prompt.clone())
            .with_messages(messages.clone())
            .with_functions(function_definitions(), FunctionCallMode::Auto);
        let first = self.ai_provider.complete(planning).await?;
        let mut usage = first.usage.clone();

        let (reply, function_invoked) = match first.function_call {
            None => (first.content.unwrap_or_default(), None),
            Some(call) => {
                // 3. Dispatch and synthesis call
                let function = ConciergeFunction::from_call(&call)?;
                let name = function.name();
                tracing::info!(
                    user_id = %cmd.user_id,
                    trace_id = %metadata.trace_id,
                    function = %name,
                    "Dispatching function call"
                );

                let outcome = self.executor.execute(&function).await;
                messages.push(ChatMessage::assistant_function_call(first.content, call));
                messages.push(ChatMessage::function(name.as_str(), outcome.to_content()?));

                let synthesis = CompletionRequest::new(metadata.clone())
                    .with_model(&self.models.synthesis)
                    .with_system_prompt(prompt)
                    .with_messages(messages.clone());
                let second = self.ai_provider.complete(synthesis).await?;
                usage = usage.combined(&second.usage);

                (second.content.unwrap_or_default(), Some(name))
            }
        };

        // 4. Persist
        messages.push(ChatMessage::assistant(reply.clone()));
        self.conversations.save(&cmd.user_id, &messages).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            trace_id = %metadata.trace_id,
            total_tokens = usage.total_tokens,
            cost_cents = usage.estimated_cost_cents,
            "Chat turn completed"
        );

        Ok(SendChatMessageResult {
            reply,
            function_invoked,
            usage,
        })
    }
}
