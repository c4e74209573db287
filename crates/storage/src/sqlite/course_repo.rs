use lms_core::model::{Course, CourseId};

use super::SqliteRepository;
use super::mapping::{course_id_from_i64, db_err, difficulty_to_str, map_course_row, u64_to_i64};
use crate::repository::{CourseRepository, NewCourseRecord, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn insert_new_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO courses (title, description, slug, thumbnail_url, difficulty, estimated_duration_mins, is_published, category, order_index, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(course.title)
        .bind(course.description)
        .bind(course.slug)
        .bind(course.thumbnail_url)
        .bind(difficulty_to_str(course.difficulty))
        .bind(i64::from(course.estimated_duration_mins))
        .bind(i64::from(course.is_published))
        .bind(course.category)
        .bind(i64::from(course.order_index))
        .bind(course.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        course_id_from_i64(res.last_insert_rowid())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, slug, thumbnail_url, difficulty, estimated_duration_mins, is_published, category, order_index, created_at
            FROM courses WHERE id = ?1
            ",
        )
        .bind(u64_to_i64("id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_course_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_published_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, slug, thumbnail_url, difficulty, estimated_duration_mins, is_published, category, order_index, created_at
            FROM courses
            WHERE is_published = 1
            ORDER BY category ASC, order_index ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            courses.push(map_course_row(&row)?);
        }
        Ok(courses)
    }

    async fn set_course_published(
        &self,
        id: CourseId,
        published: bool,
    ) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE courses SET is_published = ?1 WHERE id = ?2")
            .bind(i64::from(published))
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
