use lms_core::model::{CourseId, Lesson, LessonId};

use super::SqliteRepository;
use super::mapping::{db_err, lesson_id_from_i64, map_lesson_row, u64_to_i64};
use crate::repository::{LessonRepository, NewLessonRecord, StorageError};

#[async_trait::async_trait]
impl LessonRepository for SqliteRepository {
    async fn insert_new_lesson(&self, lesson: NewLessonRecord) -> Result<LessonId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO lessons (course_id, title, description, slug, video_url, video_duration_secs, text_content, code_examples, order_index, is_published, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(u64_to_i64("course_id", lesson.course_id.value())?)
        .bind(lesson.title)
        .bind(lesson.description)
        .bind(lesson.slug)
        .bind(lesson.video_url)
        .bind(lesson.video_duration_secs.map(i64::from))
        .bind(lesson.text_content)
        .bind(lesson.code_examples)
        .bind(i64::from(lesson.order_index))
        .bind(i64::from(lesson.is_published))
        .bind(lesson.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        lesson_id_from_i64(res.last_insert_rowid())
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, course_id, title, description, slug, video_url, video_duration_secs, text_content, code_examples, order_index, is_published, created_at
            FROM lessons WHERE id = ?1
            ",
        )
        .bind(u64_to_i64("id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_lesson_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn lessons_for_course(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, course_id, title, description, slug, video_url, video_duration_secs, text_content, code_examples, order_index, is_published, created_at
            FROM lessons
            WHERE course_id = ?1
            ORDER BY order_index ASC
            ",
        )
        .bind(u64_to_i64("course_id", course_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut lessons = Vec::with_capacity(rows.len());
        for row in rows {
            lessons.push(map_lesson_row(&row)?);
        }
        Ok(lessons)
    }
}
