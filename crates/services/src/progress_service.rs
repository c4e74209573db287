use std::sync::Arc;

use chrono::{DateTime, Utc};
use lms_core::model::{CourseId, Enrollment, LessonId, LessonProgress, UserId};
use lms_core::progress::{CourseProgress, aggregate_course_progress};
use storage::repository::{
    CourseRepository, EnrollmentRepository, LessonRepository, ProgressRepository, StorageError,
    UserRepository,
};

use crate::Clock;
use crate::error::ProgressServiceError;

/// Orchestrates enrollments, lesson completion, and the derived course
/// aggregate that is written back into the enrollment after every
/// completion event.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
    progress: Arc<dyn ProgressRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
        progress: Arc<dyn ProgressRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            courses,
            lessons,
            progress,
            enrollments,
        }
    }

    /// Enroll a user in a course at 0% progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` with `NotFound` when the user
    /// or course does not exist, and `ProgressServiceError::AlreadyEnrolled`
    /// for a duplicate enrollment.
    pub async fn enroll(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, ProgressServiceError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        self.courses
            .get_course(course_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let enrollment = Enrollment::new(user_id, course_id, self.clock.now());
        match self.enrollments.insert_new_enrollment(&enrollment).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, course_id = %course_id, "user enrolled");
                Ok(enrollment)
            }
            Err(StorageError::Conflict) => Err(ProgressServiceError::AlreadyEnrolled),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a lesson complete for a user, then refresh the owning course's
    /// enrollment aggregate.
    ///
    /// The (user, lesson) progress row is upserted: a repeat completion
    /// refreshes the completion timestamp and optionally replaces the watch
    /// time, but never duplicates the row or clears the flag. When the user
    /// is enrolled in the owning course, the recomputed percent/completed
    /// pair is written into the enrollment; otherwise only the progress row
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` with `NotFound` when the user
    /// or lesson does not exist, or other storage errors if a write fails.
    pub async fn mark_lesson_complete(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
        watch_time_secs: Option<u32>,
    ) -> Result<LessonProgress, ProgressServiceError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        let lesson = self
            .lessons
            .get_lesson(lesson_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let now = self.clock.now();
        let mut record = self
            .progress
            .get_progress(user_id, lesson_id)
            .await?
            .unwrap_or_else(|| LessonProgress::started(user_id, lesson_id));
        record.complete(watch_time_secs, now);
        self.progress.upsert_progress(&record).await?;

        self.refresh_enrollment(user_id, lesson.course_id, now)
            .await?;

        Ok(record)
    }

    /// Recompute the aggregate for a (user, course) pair.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn course_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<CourseProgress, ProgressServiceError> {
        let lessons = self.lessons.lessons_for_course(course_id).await?;
        let records = self
            .progress
            .progress_for_user(user_id, Some(course_id))
            .await?;
        Ok(aggregate_course_progress(&lessons, &records))
    }

    /// A user's enrollments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn enrollments_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Enrollment>, ProgressServiceError> {
        let enrollments = self.enrollments.enrollments_for_user(user_id).await?;
        Ok(enrollments)
    }

    /// A user's progress records, optionally restricted to one course.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn progress_for_user(
        &self,
        user_id: UserId,
        course_id: Option<CourseId>,
    ) -> Result<Vec<LessonProgress>, ProgressServiceError> {
        let records = self.progress.progress_for_user(user_id, course_id).await?;
        Ok(records)
    }

    async fn refresh_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> Result<(), ProgressServiceError> {
        let Some(mut enrollment) = self.enrollments.get_enrollment(user_id, course_id).await?
        else {
            return Ok(());
        };

        let aggregate = self.course_progress(user_id, course_id).await?;
        enrollment.apply_progress(aggregate, now);
        self.enrollments.update_enrollment(&enrollment).await?;

        tracing::info!(
            user_id = %user_id,
            course_id = %course_id,
            percent = aggregate.percent,
            completed = aggregate.completed,
            "enrollment progress updated"
        );
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lms_core::model::{Course, Difficulty, Lesson, User};
    use lms_core::time::fixed_now;
    use storage::repository::{
        InMemoryRepository, NewCourseRecord, NewLessonRecord, NewUserRecord,
    };

    struct Fixture {
        repo: InMemoryRepository,
        service: ProgressService,
        user_id: UserId,
        course_id: CourseId,
        lesson_ids: Vec<LessonId>,
    }

    async fn fixture(lesson_count: u32) -> Fixture {
        let repo = InMemoryRepository::new();

        let user = User::new(
            UserId::new(0),
            "demo@example.com",
            "$argon2id$stub",
            "Demo",
            "User",
            None,
            fixed_now(),
        )
        .unwrap();
        let user_id = repo
            .insert_new_user(NewUserRecord::from_user(&user))
            .await
            .unwrap();

        let course = Course::new(
            CourseId::new(0),
            "Course",
            "",
            "course",
            None,
            Difficulty::Beginner,
            60,
            "cat",
            0,
            fixed_now(),
        )
        .unwrap();
        let course_id = repo
            .insert_new_course(NewCourseRecord::from_course(&course))
            .await
            .unwrap();

        let mut lesson_ids = Vec::new();
        for order_index in 0..lesson_count {
            let lesson = Lesson::new(
                LessonId::new(0),
                course_id,
                format!("Lesson {order_index}"),
                "",
                format!("lesson-{order_index}"),
                None,
                None,
                None,
                None,
                order_index,
                fixed_now(),
            )
            .unwrap();
            lesson_ids.push(
                repo.insert_new_lesson(NewLessonRecord::from_lesson(&lesson))
                    .await
                    .unwrap(),
            );
        }

        let service = ProgressService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        );

        Fixture {
            repo,
            service,
            user_id,
            course_id,
            lesson_ids,
        }
    }

    #[tokio::test]
    async fn enroll_then_duplicate_is_rejected() {
        let fx = fixture(1).await;
        let enrollment = fx.service.enroll(fx.user_id, fx.course_id).await.unwrap();
        assert_eq!(enrollment.progress_percent, 0);
        assert!(!enrollment.is_completed);

        let err = fx
            .service
            .enroll(fx.user_id, fx.course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::AlreadyEnrolled));
    }

    #[tokio::test]
    async fn enroll_requires_existing_user_and_course() {
        let fx = fixture(0).await;

        let err = fx
            .service
            .enroll(UserId::new(404), fx.course_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Storage(StorageError::NotFound)
        ));

        let err = fx
            .service
            .enroll(fx.user_id, CourseId::new(404))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Storage(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn half_completed_course_reports_50_percent() {
        let fx = fixture(4).await;
        fx.service.enroll(fx.user_id, fx.course_id).await.unwrap();

        for lesson_id in &fx.lesson_ids[..2] {
            fx.service
                .mark_lesson_complete(fx.user_id, *lesson_id, Some(120))
                .await
                .unwrap();
        }

        let aggregate = fx
            .service
            .course_progress(fx.user_id, fx.course_id)
            .await
            .unwrap();
        assert_eq!(aggregate.percent, 50);
        assert!(!aggregate.completed);

        let enrollment = fx
            .service
            .enrollments_for_user(fx.user_id)
            .await
            .unwrap()
            .remove(0);
        assert_eq!(enrollment.progress_percent, 50);
        assert!(!enrollment.is_completed);
        assert_eq!(enrollment.last_accessed_at, Some(fixed_now()));
    }

    #[tokio::test]
    async fn completing_every_lesson_completes_the_enrollment() {
        let fx = fixture(3).await;
        fx.service.enroll(fx.user_id, fx.course_id).await.unwrap();

        for lesson_id in &fx.lesson_ids {
            fx.service
                .mark_lesson_complete(fx.user_id, *lesson_id, None)
                .await
                .unwrap();
        }

        let enrollment = fx
            .service
            .enrollments_for_user(fx.user_id)
            .await
            .unwrap()
            .remove(0);
        assert_eq!(enrollment.progress_percent, 100);
        assert!(enrollment.is_completed);
        assert_eq!(enrollment.completed_at, Some(fixed_now()));
    }

    #[tokio::test]
    async fn repeat_completion_keeps_a_single_row() {
        let fx = fixture(2).await;
        fx.service.enroll(fx.user_id, fx.course_id).await.unwrap();

        let lesson_id = fx.lesson_ids[0];
        fx.service
            .mark_lesson_complete(fx.user_id, lesson_id, Some(100))
            .await
            .unwrap();
        let record = fx
            .service
            .mark_lesson_complete(fx.user_id, lesson_id, Some(250))
            .await
            .unwrap();

        assert!(record.is_completed);
        assert_eq!(record.watch_time_secs, 250);

        let records = fx
            .service
            .progress_for_user(fx.user_id, Some(fx.course_id))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].watch_time_secs, 250);

        let aggregate = fx
            .service
            .course_progress(fx.user_id, fx.course_id)
            .await
            .unwrap();
        assert_eq!(aggregate.percent, 50);
    }

    #[tokio::test]
    async fn completion_without_enrollment_touches_progress_only() {
        let fx = fixture(1).await;

        fx.service
            .mark_lesson_complete(fx.user_id, fx.lesson_ids[0], None)
            .await
            .unwrap();

        let records = fx
            .service
            .progress_for_user(fx.user_id, None)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(fx
            .service
            .enrollments_for_user(fx.user_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn missing_lesson_is_not_found() {
        let fx = fixture(0).await;
        let err = fx
            .service
            .mark_lesson_complete(fx.user_id, LessonId::new(404), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Storage(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn empty_course_is_never_completed() {
        let fx = fixture(0).await;
        let aggregate = fx
            .service
            .course_progress(fx.user_id, fx.course_id)
            .await
            .unwrap();
        assert_eq!(aggregate.percent, 0);
        assert!(!aggregate.completed);
    }

    #[tokio::test]
    async fn enrollment_write_failures_surface() {
        struct BrokenEnrollments {
            inner: InMemoryRepository,
        }

        #[async_trait::async_trait]
        impl EnrollmentRepository for BrokenEnrollments {
            async fn insert_new_enrollment(
                &self,
                enrollment: &Enrollment,
            ) -> Result<(), StorageError> {
                self.inner.insert_new_enrollment(enrollment).await
            }

            async fn get_enrollment(
                &self,
                user_id: UserId,
                course_id: CourseId,
            ) -> Result<Option<Enrollment>, StorageError> {
                self.inner.get_enrollment(user_id, course_id).await
            }

            async fn enrollments_for_user(
                &self,
                user_id: UserId,
            ) -> Result<Vec<Enrollment>, StorageError> {
                self.inner.enrollments_for_user(user_id).await
            }

            async fn update_enrollment(
                &self,
                _enrollment: &Enrollment,
            ) -> Result<(), StorageError> {
                Err(StorageError::Connection("disk went away".into()))
            }
        }

        let fx = fixture(1).await;
        let service = ProgressService::new(
            Clock::fixed(fixed_now() + Duration::hours(1)),
            Arc::new(fx.repo.clone()),
            Arc::new(fx.repo.clone()),
            Arc::new(fx.repo.clone()),
            Arc::new(fx.repo.clone()),
            Arc::new(BrokenEnrollments {
                inner: fx.repo.clone(),
            }),
        );

        service.enroll(fx.user_id, fx.course_id).await.unwrap();
        let err = service
            .mark_lesson_complete(fx.user_id, fx.lesson_ids[0], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Storage(StorageError::Connection(_))
        ));
    }
}
