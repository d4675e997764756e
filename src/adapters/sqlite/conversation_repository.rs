//! SQLite implementation of ConversationRepository.
//!
//! The full history lives in one JSON text column. Nothing stops a second row
//! from appearing for the same guest, so reads and writes always target the
//! oldest row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::concierge::{ChatMessage, Conversation};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::ConversationRepository;

/// SQLite implementation of ConversationRepository.
#[derive(Clone)]
pub struct SqliteConversationRepository {
    pool: SqlitePool,
}

impl SqliteConversationRepository {
    /// Creates a new SqliteConversationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT messages, created_at, updated_at
            FROM conversations
            WHERE user_id = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch conversation: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let blob: String = row.try_get("messages")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        let messages = Conversation::decode_messages(&blob).map_err(|e| {
            DomainError::new(
                ErrorCode::CorruptHistory,
                format!("Stored messages are not valid chat history: {}", e),
            )
            .with_detail("user_id", user_id.as_str())
        })?;

        Ok(Some(Conversation {
            user_id: user_id.clone(),
            messages,
            created_at: Timestamp::from_datetime(created_at),
            updated_at: Timestamp::from_datetime(updated_at),
        }))
    }
}

#[async_trait]
impl ConversationRepository for SqliteConversationRepository {
    async fn get_or_create(&self, user_id: &UserId) -> Result<Conversation, DomainError> {
        if let Some(conversation) = self.find(user_id).await? {
            return Ok(conversation);
        }

        let conversation = Conversation::empty(user_id.clone(), Timestamp::now());

        sqlx::query(
            r#"
            INSERT INTO conversations (user_id, messages, created_at, updated_at)
            VALUES (?, '[]', ?, ?)
            "#,
        )
        .bind(user_id.as_str())
        .bind(*conversation.created_at.as_datetime())
        .bind(*conversation.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert conversation: {}", e)))?;

        Ok(conversation)
    }

    async fn save(&self, user_id: &UserId, messages: &[ChatMessage]) -> Result<(), DomainError> {
        let blob = Conversation::encode_messages(messages).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode messages: {}", e),
            )
        })?;

        let result = sqlx::query(
            r#"
            UPDATE conversations
            SET messages = ?, updated_at = ?
            WHERE id = (
                SELECT id FROM conversations WHERE user_id = ? ORDER BY id ASC LIMIT 1
            )
            "#,
        )
        .bind(blob)
        .bind(*Timestamp::now().as_datetime())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update conversation: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(
                DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
                    .with_detail("user_id", user_id.as_str()),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{connect, connect_in_memory, run_migrations};
    use crate::config::DatabaseConfig;
    use crate::domain::concierge::FunctionCall;
    use proptest::prelude::*;

    async fn repo() -> SqliteConversationRepository {
        SqliteConversationRepository::new(connect_in_memory().await.unwrap())
    }

    fn guest(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn raw_blob(repo: &SqliteConversationRepository, user_id: &str) -> String {
        sqlx::query_scalar(
            "SELECT messages FROM conversations WHERE user_id = ? ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_one(&repo.pool)
        .await
        .unwrap()
    }

    fn sample_history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("Any rooms?"),
            ChatMessage::assistant_function_call(None, FunctionCall::new("get_rooms", "{}")),
            ChatMessage::function("get_rooms", r#"[{"id":1,"name":"Deluxe"}]"#),
            ChatMessage::assistant("We have a Deluxe room."),
        ]
    }

    #[tokio::test]
    async fn get_or_create_starts_with_empty_history() {
        let repo = repo().await;

        let conversation = repo.get_or_create(&guest("guest-1")).await.unwrap();

        assert!(conversation.messages.is_empty());
        assert_eq!(raw_blob(&repo, "guest-1").await, "[]");
    }

    #[tokio::test]
    async fn get_or_create_does_not_duplicate_rows() {
        let repo = repo().await;
        repo.get_or_create(&guest("guest-1")).await.unwrap();
        repo.get_or_create(&guest("guest-1")).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn save_overwrites_history() {
        let repo = repo().await;
        let user_id = guest("guest-1");
        repo.get_or_create(&user_id).await.unwrap();

        repo.save(&user_id, &sample_history()).await.unwrap();
        repo.save(&user_id, &[ChatMessage::user("Only this")]).await.unwrap();

        let conversation = repo.get_or_create(&user_id).await.unwrap();
        assert_eq!(conversation.messages, vec![ChatMessage::user("Only this")]);
    }

    #[tokio::test]
    async fn save_without_conversation_fails() {
        let repo = repo().await;

        let err = repo
            .save(&guest("nobody"), &sample_history())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ConversationNotFound);
    }

    #[tokio::test]
    async fn oldest_row_wins_on_read_and_write() {
        let repo = repo().await;
        let user_id = guest("guest-1");
        repo.get_or_create(&user_id).await.unwrap();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO conversations (user_id, messages, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind("guest-1")
        .bind(r#"[{"role":"user","content":"newer row"}]"#)
        .bind(now)
        .bind(now)
        .execute(&repo.pool)
        .await
        .unwrap();

        assert!(repo.get_or_create(&user_id).await.unwrap().messages.is_empty());

        repo.save(&user_id, &[ChatMessage::user("saved")]).await.unwrap();

        let newest: String = sqlx::query_scalar(
            "SELECT messages FROM conversations WHERE user_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind("guest-1")
        .fetch_one(&repo.pool)
        .await
        .unwrap();
        assert_eq!(newest, r#"[{"role":"user","content":"newer row"}]"#);
        assert_eq!(
            repo.get_or_create(&user_id).await.unwrap().messages,
            vec![ChatMessage::user("saved")]
        );
    }

    #[tokio::test]
    async fn corrupt_history_is_an_error() {
        let repo = repo().await;
        let user_id = guest("guest-1");
        repo.get_or_create(&user_id).await.unwrap();
        sqlx::query("UPDATE conversations SET messages = 'not json' WHERE user_id = ?")
            .bind("guest-1")
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = repo.get_or_create(&user_id).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::CorruptHistory);
    }

    #[tokio::test]
    async fn history_survives_reopening_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.path().join("chat.sqlite").display()),
            ..DatabaseConfig::default()
        };
        let user_id = guest("guest-1");

        let pool = connect(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteConversationRepository::new(pool.clone());
        repo.get_or_create(&user_id).await.unwrap();
        repo.save(&user_id, &sample_history()).await.unwrap();
        pool.close().await;

        let repo = SqliteConversationRepository::new(connect(&config).await.unwrap());
        let conversation = repo.get_or_create(&user_id).await.unwrap();
        assert_eq!(conversation.messages, sample_history());
    }

    fn arb_message() -> impl Strategy<Value = ChatMessage> {
        let text = "[a-zA-Z0-9 .,!?\"'\\\\{}é€]{0,40}";
        prop_oneof![
            text.prop_map(|s: String| ChatMessage::user(s)),
            text.prop_map(|s: String| ChatMessage::assistant(s)),
            (prop::option::of(text), "[a-z_]{1,16}", text).prop_map(|(content, name, args)| {
                ChatMessage::assistant_function_call(content, FunctionCall::new(name, args))
            }),
            ("[a-z_]{1,16}", text).prop_map(|(name, content)| ChatMessage::function(name, content)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn reloaded_history_resaves_byte_identical(messages in prop::collection::vec(arb_message(), 0..8)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let repo = repo().await;
                let user_id = guest("guest-1");
                repo.get_or_create(&user_id).await.unwrap();
                repo.save(&user_id, &messages).await.unwrap();
                let first = raw_blob(&repo, "guest-1").await;

                let reloaded = repo.get_or_create(&user_id).await.unwrap();
                repo.save(&user_id, &reloaded.messages).await.unwrap();
                let second = raw_blob(&repo, "guest-1").await;

                assert_eq!(reloaded.messages, messages);
                assert_eq!(first, second);
            });
        }
    }
}
