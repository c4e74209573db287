use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::ids::{CourseId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson slug cannot be empty")]
    EmptySlug,

    #[error("video url is not valid: {0}")]
    InvalidVideoUrl(String),

    #[error("video duration must be > 0 seconds when present")]
    InvalidVideoDuration,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single unit of course content.
///
/// Video, text, and code-example fields are all optional; the code examples
/// are opaque JSON text that this layer never interprets. `order_index` is
/// unique within a course so lessons sequence deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub video_url: Option<String>,
    pub video_duration_secs: Option<u32>,
    pub text_content: Option<String>,
    pub code_examples: Option<String>,
    pub order_index: u32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// Creates a new, unpublished lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` for a blank title or slug, an unparseable video
    /// URL, or a zero video duration.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LessonId,
        course_id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        video_url: Option<String>,
        video_duration_secs: Option<u32>,
        text_content: Option<String>,
        code_examples: Option<String>,
        order_index: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, LessonError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }

        let slug = slug.into().trim().to_owned();
        if slug.is_empty() {
            return Err(LessonError::EmptySlug);
        }

        if let Some(raw) = &video_url {
            Url::parse(raw).map_err(|_| LessonError::InvalidVideoUrl(raw.clone()))?;
        }

        if video_duration_secs == Some(0) {
            return Err(LessonError::InvalidVideoDuration);
        }

        Ok(Self {
            id,
            course_id,
            title,
            description: description.into(),
            slug,
            video_url,
            video_duration_secs,
            text_content,
            code_examples,
            order_index,
            is_published: false,
            created_at,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
