use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::CourseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("course slug cannot be empty")]
    EmptySlug,

    #[error("course category cannot be empty")]
    EmptyCategory,

    #[error("estimated duration must be > 0 minutes")]
    InvalidDuration,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Coarse difficulty rating used to group and sort the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course in the catalog: an ordered collection of lessons.
///
/// Courses are created unpublished and only appear in the public catalog
/// once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    slug: String,
    thumbnail_url: Option<String>,
    difficulty: Difficulty,
    estimated_duration_mins: u32,
    is_published: bool,
    category: String,
    order_index: u32,
    created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a new, unpublished course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if title, slug, or category is blank, or if the
    /// estimated duration is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        thumbnail_url: Option<String>,
        difficulty: Difficulty,
        estimated_duration_mins: u32,
        category: impl Into<String>,
        order_index: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let slug = slug.into().trim().to_owned();
        if slug.is_empty() {
            return Err(CourseError::EmptySlug);
        }

        let category = category.into().trim().to_owned();
        if category.is_empty() {
            return Err(CourseError::EmptyCategory);
        }

        if estimated_duration_mins == 0 {
            return Err(CourseError::InvalidDuration);
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            slug,
            thumbnail_url,
            difficulty,
            estimated_duration_mins,
            is_published: false,
            category,
            order_index,
            created_at,
        })
    }

    /// Rehydrates a course from storage, trusting persisted values.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_persisted(
        id: CourseId,
        title: String,
        description: String,
        slug: String,
        thumbnail_url: Option<String>,
        difficulty: Difficulty,
        estimated_duration_mins: u32,
        is_published: bool,
        category: String,
        order_index: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            slug,
            thumbnail_url,
            difficulty,
            estimated_duration_mins,
            is_published,
            category,
            order_index,
            created_at,
        }
    }

    /// Marks the course as published, making it visible in the catalog.
    pub fn publish(&mut self) {
        self.is_published = true;
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn estimated_duration_mins(&self) -> u32 {
        self.estimated_duration_mins
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.is_published
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build_course(title: &str, slug: &str, category: &str, mins: u32) -> Result<Course, CourseError> {
        Course::new(
            CourseId::new(1),
            title,
            "Pointers, lifetimes, the usual suspects",
            slug,
            None,
            Difficulty::Beginner,
            mins,
            category,
            0,
            fixed_now(),
        )
    }

    #[test]
    fn new_course_is_unpublished() {
        let course = build_course("Systems 101", "systems-101", "engineering", 90).unwrap();
        assert!(!course.is_published());
        assert_eq!(course.title(), "Systems 101");
        assert_eq!(course.slug(), "systems-101");
        assert_eq!(course.difficulty(), Difficulty::Beginner);
    }

    #[test]
    fn publish_flips_the_flag() {
        let mut course = build_course("Systems 101", "systems-101", "engineering", 90).unwrap();
        course.publish();
        assert!(course.is_published());
    }

    #[test]
    fn rejects_blank_title_slug_category() {
        assert_eq!(
            build_course("  ", "slug", "cat", 10).unwrap_err(),
            CourseError::EmptyTitle
        );
        assert_eq!(
            build_course("Title", " ", "cat", 10).unwrap_err(),
            CourseError::EmptySlug
        );
        assert_eq!(
            build_course("Title", "slug", "", 10).unwrap_err(),
            CourseError::EmptyCategory
        );
    }

    #[test]
    fn rejects_zero_duration() {
        assert_eq!(
            build_course("Title", "slug", "cat", 0).unwrap_err(),
            CourseError::InvalidDuration
        );
    }

    #[test]
    fn trims_title_and_slug() {
        let course = build_course("  Systems 101  ", "  systems-101 ", " engineering ", 90).unwrap();
        assert_eq!(course.title(), "Systems 101");
        assert_eq!(course.slug(), "systems-101");
        assert_eq!(course.category(), "engineering");
    }
}
