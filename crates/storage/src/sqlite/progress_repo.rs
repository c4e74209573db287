use lms_core::model::{CourseId, LessonId, LessonProgress, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_progress_row, u64_to_i64};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, lesson_id, is_completed, completed_at, watch_time_secs
            FROM user_progress
            WHERE user_id = ?1 AND lesson_id = ?2
            ",
        )
        .bind(u64_to_i64("user_id", user_id.value())?)
        .bind(u64_to_i64("lesson_id", lesson_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_progress_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_progress (user_id, lesson_id, is_completed, completed_at, watch_time_secs)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, lesson_id) DO UPDATE SET
                is_completed = excluded.is_completed,
                completed_at = excluded.completed_at,
                watch_time_secs = excluded.watch_time_secs
            ",
        )
        .bind(u64_to_i64("user_id", progress.user_id.value())?)
        .bind(u64_to_i64("lesson_id", progress.lesson_id.value())?)
        .bind(i64::from(progress.is_completed))
        .bind(progress.completed_at)
        .bind(i64::from(progress.watch_time_secs))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn progress_for_user(
        &self,
        user_id: UserId,
        course_id: Option<CourseId>,
    ) -> Result<Vec<LessonProgress>, StorageError> {
        let rows = match course_id {
            Some(course_id) => {
                sqlx::query(
                    r"
                    SELECT p.user_id, p.lesson_id, p.is_completed, p.completed_at, p.watch_time_secs
                    FROM user_progress p
                    INNER JOIN lessons l ON l.id = p.lesson_id
                    WHERE p.user_id = ?1 AND l.course_id = ?2
                    ORDER BY p.lesson_id ASC
                    ",
                )
                .bind(u64_to_i64("user_id", user_id.value())?)
                .bind(u64_to_i64("course_id", course_id.value())?)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT user_id, lesson_id, is_completed, completed_at, watch_time_secs
                    FROM user_progress
                    WHERE user_id = ?1
                    ORDER BY lesson_id ASC
                    ",
                )
                .bind(u64_to_i64("user_id", user_id.value())?)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(map_progress_row(&row)?);
        }
        Ok(records)
    }
}
