use lms_core::model::{QuizAttempt, QuizId, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, encode_answers, map_attempt_row, u64_to_i64};
use crate::repository::{AttemptRecord, AttemptRepository, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<i64, StorageError> {
        let answers = encode_answers(&attempt.answers)?;

        let res = sqlx::query(
            r"
            INSERT INTO quiz_attempts (user_id, quiz_id, answers, score, is_passed, attempted_at, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(u64_to_i64("user_id", attempt.user_id.value())?)
        .bind(u64_to_i64("quiz_id", attempt.quiz_id.value())?)
        .bind(answers)
        .bind(i64::from(attempt.score))
        .bind(i64::from(attempt.passed))
        .bind(attempt.attempted_at)
        .bind(attempt.completed_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(res.last_insert_rowid())
    }

    async fn attempts_for_user(
        &self,
        user_id: UserId,
        quiz_id: Option<QuizId>,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let rows = match quiz_id {
            Some(quiz_id) => {
                sqlx::query(
                    r"
                    SELECT id, user_id, quiz_id, answers, score, is_passed, attempted_at, completed_at
                    FROM quiz_attempts
                    WHERE user_id = ?1 AND quiz_id = ?2
                    ORDER BY attempted_at DESC, id DESC
                    ",
                )
                .bind(u64_to_i64("user_id", user_id.value())?)
                .bind(u64_to_i64("quiz_id", quiz_id.value())?)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, user_id, quiz_id, answers, score, is_passed, attempted_at, completed_at
                    FROM quiz_attempts
                    WHERE user_id = ?1
                    ORDER BY attempted_at DESC, id DESC
                    ",
                )
                .bind(u64_to_i64("user_id", user_id.value())?)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut attempts = Vec::with_capacity(rows.len());
        for row in rows {
            attempts.push(map_attempt_row(&row)?);
        }
        Ok(attempts)
    }
}
