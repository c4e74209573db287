use lms_core::model::{CourseId, Enrollment, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_enrollment_row, u64_to_i64};
use crate::repository::{EnrollmentRepository, StorageError};

#[async_trait::async_trait]
impl EnrollmentRepository for SqliteRepository {
    async fn insert_new_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_enrollments (user_id, course_id, enrolled_at, progress_percentage, is_completed, completed_at, last_accessed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(u64_to_i64("user_id", enrollment.user_id.value())?)
        .bind(u64_to_i64("course_id", enrollment.course_id.value())?)
        .bind(enrollment.enrolled_at)
        .bind(i64::from(enrollment.progress_percent))
        .bind(i64::from(enrollment.is_completed))
        .bind(enrollment.completed_at)
        .bind(enrollment.last_accessed_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, course_id, enrolled_at, progress_percentage, is_completed, completed_at, last_accessed_at
            FROM user_enrollments
            WHERE user_id = ?1 AND course_id = ?2
            ",
        )
        .bind(u64_to_i64("user_id", user_id.value())?)
        .bind(u64_to_i64("course_id", course_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_enrollment_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn enrollments_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Enrollment>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, course_id, enrolled_at, progress_percentage, is_completed, completed_at, last_accessed_at
            FROM user_enrollments
            WHERE user_id = ?1
            ORDER BY enrolled_at ASC, course_id ASC
            ",
        )
        .bind(u64_to_i64("user_id", user_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut enrollments = Vec::with_capacity(rows.len());
        for row in rows {
            enrollments.push(map_enrollment_row(&row)?);
        }
        Ok(enrollments)
    }

    async fn update_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE user_enrollments
            SET progress_percentage = ?1,
                is_completed = ?2,
                completed_at = ?3,
                last_accessed_at = ?4
            WHERE user_id = ?5 AND course_id = ?6
            ",
        )
        .bind(i64::from(enrollment.progress_percent))
        .bind(i64::from(enrollment.is_completed))
        .bind(enrollment.completed_at)
        .bind(enrollment.last_accessed_at)
        .bind(u64_to_i64("user_id", enrollment.user_id.value())?)
        .bind(u64_to_i64("course_id", enrollment.course_id.value())?)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
