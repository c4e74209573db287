use chrono::{DateTime, Utc};
use lms_core::model::{User, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_user_row, u64_to_i64, user_id_from_i64};
use crate::repository::{NewUserRecord, StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_new_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO users (email, password_hash, first_name, last_name, avatar_url, is_active, current_streak, longest_streak, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, 0, 0, ?6)
            ",
        )
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.avatar_url)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        user_id_from_i64(res.last_insert_rowid())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, email, password_hash, first_name, last_name, avatar_url, is_active, last_login, current_streak, longest_streak, created_at
            FROM users WHERE id = ?1
            ",
        )
        .bind(u64_to_i64("id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_user_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, email, password_hash, first_name, last_name, avatar_url, is_active, last_login, current_streak, longest_streak, created_at
            FROM users WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_user_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
            .bind(at)
            .bind(u64_to_i64("id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
