use std::sync::Arc;

use lms_core::model::{Course, CourseId, Difficulty};
use storage::repository::{CourseRepository, NewCourseRecord};

use crate::Clock;
use crate::error::CourseServiceError;

/// Input for creating a catalog entry. Courses always start unpublished.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub thumbnail_url: Option<String>,
    pub difficulty: Difficulty,
    pub estimated_duration_mins: u32,
    pub category: String,
    pub order_index: u32,
}

/// Orchestrates catalog management.
#[derive(Clone)]
pub struct CourseService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(clock: Clock, courses: Arc<dyn CourseRepository>) -> Self {
        Self { clock, courses }
    }

    /// Validate and persist a new course.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` for validation failures.
    /// Returns `CourseServiceError::Storage` if persistence fails.
    pub async fn create_course(&self, input: NewCourse) -> Result<CourseId, CourseServiceError> {
        let now = self.clock.now();
        let course = Course::new(
            CourseId::new(0),
            input.title,
            input.description,
            input.slug,
            input.thumbnail_url,
            input.difficulty,
            input.estimated_duration_mins,
            input.category,
            input.order_index,
            now,
        )?;
        let course_id = self
            .courses
            .insert_new_course(NewCourseRecord::from_course(&course))
            .await?;
        Ok(course_id)
    }

    /// Make a course visible in the public catalog.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` with `NotFound` when the course
    /// does not exist.
    pub async fn publish_course(&self, course_id: CourseId) -> Result<(), CourseServiceError> {
        self.courses.set_course_published(course_id, true).await?;
        tracing::info!(course_id = %course_id, "course published");
        Ok(())
    }

    /// Fetch a course by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn get_course(&self, course_id: CourseId) -> Result<Option<Course>, CourseServiceError> {
        let course = self.courses.get_course(course_id).await?;
        Ok(course)
    }

    /// Published courses ordered by category, then ordering index.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn list_published_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        let courses = self.courses.list_published_courses().await?;
        Ok(courses)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
