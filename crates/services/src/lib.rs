#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod course_service;
pub mod error;
pub mod lesson_service;
pub mod progress_service;
pub mod quiz_service;
pub mod user_service;

pub use lms_core::Clock;

pub use app_services::AppServices;
pub use course_service::{CourseService, NewCourse};
pub use error::{
    AppServicesError, CourseServiceError, LessonServiceError, ProgressServiceError,
    QuizServiceError, UserServiceError,
};
pub use lesson_service::{LessonService, NewLesson};
pub use progress_service::ProgressService;
pub use quiz_service::{NewQuiz, QuizService, RecordedAttempt};
pub use user_service::{NewUser, UserService};
