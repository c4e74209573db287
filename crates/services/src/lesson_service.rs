use std::sync::Arc;

use lms_core::model::{CourseId, Lesson, LessonId};
use storage::repository::{CourseRepository, LessonRepository, NewLessonRecord, StorageError};

use crate::Clock;
use crate::error::LessonServiceError;

/// Input for adding a lesson to a course. Lessons always start unpublished.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub video_url: Option<String>,
    pub video_duration_secs: Option<u32>,
    pub text_content: Option<String>,
    pub code_examples: Option<String>,
    pub order_index: u32,
}

/// Orchestrates lesson creation and sequencing.
#[derive(Clone)]
pub struct LessonService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl LessonService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            lessons,
        }
    }

    /// Validate and persist a new lesson under an existing course.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` with `NotFound` when the parent
    /// course does not exist, or with `Conflict` when the course already has
    /// a lesson at the same ordering index.
    /// Returns `LessonServiceError::Lesson` for validation failures.
    pub async fn create_lesson(&self, input: NewLesson) -> Result<LessonId, LessonServiceError> {
        self.courses
            .get_course(input.course_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let now = self.clock.now();
        let lesson = Lesson::new(
            LessonId::new(0),
            input.course_id,
            input.title,
            input.description,
            input.slug,
            input.video_url,
            input.video_duration_secs,
            input.text_content,
            input.code_examples,
            input.order_index,
            now,
        )?;

        let lesson_id = self
            .lessons
            .insert_new_lesson(NewLessonRecord::from_lesson(&lesson))
            .await?;
        Ok(lesson_id)
    }

    /// All lessons of a course in sequence order, published or not.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn lessons_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Lesson>, LessonServiceError> {
        let lessons = self.lessons.lessons_for_course(course_id).await?;
        Ok(lessons)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
