mod course;
mod enrollment;
mod ids;
mod lesson;
mod quiz;
mod user;

pub use ids::{CourseId, LessonId, QuizId, UserId};

pub use course::{Course, CourseError, Difficulty};
pub use enrollment::{Enrollment, LessonProgress};
pub use lesson::{Lesson, LessonError};
pub use quiz::{Question, Quiz, QuizAttempt, QuizError};
pub use user::{User, UserError};
