//! SQLite implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::concierge::User;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::UserRepository;

/// SQLite implementation of UserRepository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new SqliteUserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, full_name, email, last_interaction, created_at, updated_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(|row| row_to_user(&row)).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_or_create(&self, user_id: &UserId) -> Result<User, DomainError> {
        let fresh = User::new(user_id.clone(), Timestamp::now());

        sqlx::query(
            r#"
            INSERT INTO users (user_id, full_name, email, last_interaction, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(fresh.user_id.as_str())
        .bind(fresh.full_name.as_deref())
        .bind(fresh.email.as_deref())
        .bind(*fresh.last_interaction.as_datetime())
        .bind(*fresh.created_at.as_datetime())
        .bind(*fresh.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert user: {}", e)))?;

        self.find(user_id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, "User vanished after insert")
                .with_detail("user_id", user_id.as_str())
        })
    }

    async fn touch(&self, user_id: &UserId, at: Timestamp) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET last_interaction = ?, updated_at = ? WHERE user_id = ?",
        )
        .bind(*at.as_datetime())
        .bind(*at.as_datetime())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found")
                .with_detail("user_id", user_id.as_str()));
        }

        Ok(())
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let user_id: String = row.try_get("user_id")?;
    let last_interaction: DateTime<Utc> = row.try_get("last_interaction")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        user_id: UserId::new(user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Stored user id is invalid: {}", e))
        })?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        last_interaction: Timestamp::from_datetime(last_interaction),
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::connect_in_memory;

    async fn repo() -> SqliteUserRepository {
        SqliteUserRepository::new(connect_in_memory().await.unwrap())
    }

    fn guest(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn get_or_create_creates_new_user() {
        let repo = repo().await;

        let user = repo.get_or_create(&guest("guest-1")).await.unwrap();

        assert_eq!(user.user_id.as_str(), "guest-1");
        assert!(user.full_name.is_none());
        assert!(user.email.is_none());
        assert_eq!(user.last_interaction, user.created_at);
    }

    #[tokio::test]
    async fn get_or_create_returns_existing_user() {
        let repo = repo().await;
        let first = repo.get_or_create(&guest("guest-1")).await.unwrap();

        let second = repo.get_or_create(&guest("guest-1")).await.unwrap();

        assert_eq!(first, second);
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn touch_updates_last_interaction() {
        let repo = repo().await;
        let mut user = repo.get_or_create(&guest("guest-1")).await.unwrap();
        let before = user.last_interaction;

        let at = user.touch(before);
        repo.touch(&user.user_id, at).await.unwrap();

        let reloaded = repo.get_or_create(&guest("guest-1")).await.unwrap();
        assert_eq!(reloaded.last_interaction, at);
        assert!(reloaded.last_interaction.is_after(&before));
        assert_eq!(reloaded.created_at, user.created_at);
    }

    #[tokio::test]
    async fn touch_unknown_user_fails() {
        let repo = repo().await;

        let err = repo
            .touch(&guest("nobody"), Timestamp::now())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::UserNotFound);
    }
}
