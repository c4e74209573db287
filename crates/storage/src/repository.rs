use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lms_core::model::{
    Course, CourseId, Difficulty, Enrollment, Lesson, LessonId, LessonProgress, Question, Quiz,
    QuizAttempt, QuizId, User, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── INSERT RECORDS ────────────────────────────────────────────────────────────
//

/// Insert payload for a user; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewUserRecord {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
        }
    }

    fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            avatar_url: self.avatar_url,
            is_active: true,
            last_login: None,
            current_streak: 0,
            longest_streak: 0,
            created_at: self.created_at,
        }
    }
}

/// Insert payload for a course; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewCourseRecord {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub thumbnail_url: Option<String>,
    pub difficulty: Difficulty,
    pub estimated_duration_mins: u32,
    pub is_published: bool,
    pub category: String,
    pub order_index: u32,
    pub created_at: DateTime<Utc>,
}

impl NewCourseRecord {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            slug: course.slug().to_owned(),
            thumbnail_url: course.thumbnail_url().map(str::to_owned),
            difficulty: course.difficulty(),
            estimated_duration_mins: course.estimated_duration_mins(),
            is_published: course.is_published(),
            category: course.category().to_owned(),
            order_index: course.order_index(),
            created_at: course.created_at(),
        }
    }

    fn into_course(self, id: CourseId) -> Course {
        Course::from_persisted(
            id,
            self.title,
            self.description,
            self.slug,
            self.thumbnail_url,
            self.difficulty,
            self.estimated_duration_mins,
            self.is_published,
            self.category,
            self.order_index,
            self.created_at,
        )
    }
}

/// Insert payload for a lesson; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewLessonRecord {
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

impl NewLessonRecord {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            course_id: lesson.course_id,
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            slug: lesson.slug.clone(),
            video_url: lesson.video_url.clone(),
            video_duration_secs: lesson.video_duration_secs,
            text_content: lesson.text_content.clone(),
            code_examples: lesson.code_examples.clone(),
            order_index: lesson.order_index,
            is_published: lesson.is_published,
            created_at: lesson.created_at,
        }
    }

    fn into_lesson(self, id: LessonId) -> Lesson {
        Lesson {
            id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            slug: self.slug,
            video_url: self.video_url,
            video_duration_secs: self.video_duration_secs,
            text_content: self.text_content,
            code_examples: self.code_examples,
            order_index: self.order_index,
            is_published: self.is_published,
            created_at: self.created_at,
        }
    }
}

/// Insert payload for a quiz; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewQuizRecord {
    pub lesson_id: LessonId,
    pub title: String,
    pub questions: Vec<Question>,
    pub passing_score: u8,
    pub created_at: DateTime<Utc>,
}

impl NewQuizRecord {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            lesson_id: quiz.lesson_id,
            title: quiz.title.clone(),
            questions: quiz.questions.clone(),
            passing_score: quiz.passing_score,
            created_at: quiz.created_at,
        }
    }

    fn into_quiz(self, id: QuizId) -> Quiz {
        Quiz {
            id,
            lesson_id: self.lesson_id,
            title: self.title,
            questions: self.questions,
            passing_score: self.passing_score,
            created_at: self.created_at,
        }
    }
}

/// Persisted shape of a quiz attempt, with its storage-assigned row id.
///
/// Attempts are append-only; `id` is `None` until the row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub id: Option<i64>,
    pub user_id: UserId,
    pub quiz_id: QuizId,
    pub answers: Vec<i64>,
    pub score: u8,
    pub passed: bool,
    pub attempted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    #[must_use]
    pub fn from_attempt(attempt: &QuizAttempt) -> Self {
        Self {
            id: None,
            user_id: attempt.user_id,
            quiz_id: attempt.quiz_id,
            answers: attempt.answers.clone(),
            score: attempt.score,
            passed: attempt.passed,
            attempted_at: attempt.attempted_at,
            completed_at: attempt.completed_at,
        }
    }

    /// Convert the record back into the domain attempt, dropping the row id.
    #[must_use]
    pub fn into_attempt(self) -> QuizAttempt {
        QuizAttempt {
            user_id: self.user_id,
            quiz_id: self.quiz_id,
            answers: self.answers,
            score: self.score,
            passed: self.passed,
            attempted_at: self.attempted_at,
            completed_at: self.completed_at,
        }
    }
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Repository contract for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the email is already registered,
    /// or other storage errors.
    async fn insert_new_user(&self, user: NewUserRecord) -> Result<UserId, StorageError>;

    /// Fetch a user by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Fetch a user by email. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Stamp the user's last-login time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist.
    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), StorageError>;
}

/// Repository contract for the course catalog.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn insert_new_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError>;

    /// Fetch a course by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError>;

    /// List published courses ordered by category, then ordering index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing fails.
    async fn list_published_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Set a course's published flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn set_course_published(
        &self,
        id: CourseId,
        published: bool,
    ) -> Result<(), StorageError>;
}

/// Repository contract for lessons.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Persist a new lesson and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn insert_new_lesson(&self, lesson: NewLessonRecord) -> Result<LessonId, StorageError>;

    /// Fetch a lesson by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError>;

    /// All lessons of a course ordered by ordering index, published or not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing fails.
    async fn lessons_for_course(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError>;
}

/// Repository contract for quizzes.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a new quiz and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn insert_new_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError>;

    /// Fetch a quiz by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails, including
    /// `StorageError::Serialization` when the stored question payload does
    /// not parse.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError>;
}

/// Repository contract for quiz attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append an attempt and return the assigned row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<i64, StorageError>;

    /// A user's attempts, newest first, optionally for one quiz only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing fails.
    async fn attempts_for_user(
        &self,
        user_id: UserId,
        quiz_id: Option<QuizId>,
    ) -> Result<Vec<AttemptRecord>, StorageError>;
}

/// Repository contract for per-lesson progress records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the single record for a (user, lesson) pair. `Ok(None)` when
    /// the user has no progress for the lesson yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<LessonProgress>, StorageError>;

    /// Insert or update the record for the (user, lesson) pair. At most one
    /// row exists per pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError>;

    /// A user's progress records, optionally restricted to the lessons of
    /// one course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing fails.
    async fn progress_for_user(
        &self,
        user_id: UserId,
        course_id: Option<CourseId>,
    ) -> Result<Vec<LessonProgress>, StorageError>;
}

/// Repository contract for enrollments.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Persist a new enrollment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the user is already enrolled in
    /// the course, or other storage errors.
    async fn insert_new_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError>;

    /// Fetch the enrollment for a (user, course) pair. `Ok(None)` when the
    /// user is not enrolled.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StorageError>;

    /// All of a user's enrollments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing fails.
    async fn enrollments_for_user(&self, user_id: UserId)
        -> Result<Vec<Enrollment>, StorageError>;

    /// Overwrite the stored enrollment for its (user, course) pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no enrollment exists for the pair.
    async fn update_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    lessons: Arc<Mutex<HashMap<LessonId, Lesson>>>,
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    attempts: Arc<Mutex<Vec<AttemptRecord>>>,
    progress: Arc<Mutex<HashMap<(UserId, LessonId), LessonProgress>>>,
    enrollments: Arc<Mutex<HashMap<(UserId, CourseId), Enrollment>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn next_id<K, V, F>(map: &HashMap<K, V>, value: F) -> u64
where
    F: Fn(&K) -> u64,
{
    map.keys().map(value).max().unwrap_or(0) + 1
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_new_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let mut guard = self.users.lock().map_err(lock_err)?;
        if guard.values().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict);
        }
        let id = UserId::new(next_id(&guard, UserId::value));
        guard.insert(id, user.into_user(id));
        Ok(id)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let guard = self.users.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let guard = self.users.lock().map_err(lock_err)?;
        Ok(guard.values().find(|u| u.email == email).cloned())
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(lock_err)?;
        let user = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.last_login = Some(at);
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_new_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError> {
        let mut guard = self.courses.lock().map_err(lock_err)?;
        let id = CourseId::new(next_id(&guard, CourseId::value));
        guard.insert(id, course.into_course(id));
        Ok(id)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self.courses.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_published_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(lock_err)?;
        let mut courses: Vec<Course> = guard
            .values()
            .filter(|c| c.is_published())
            .cloned()
            .collect();
        courses.sort_by(|a, b| {
            a.category()
                .cmp(b.category())
                .then(a.order_index().cmp(&b.order_index()))
        });
        Ok(courses)
    }

    async fn set_course_published(
        &self,
        id: CourseId,
        published: bool,
    ) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(lock_err)?;
        let course = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        if published {
            course.publish();
        } else {
            let unpublished = Course::from_persisted(
                course.id(),
                course.title().to_owned(),
                course.description().to_owned(),
                course.slug().to_owned(),
                course.thumbnail_url().map(str::to_owned),
                course.difficulty(),
                course.estimated_duration_mins(),
                false,
                course.category().to_owned(),
                course.order_index(),
                course.created_at(),
            );
            *course = unpublished;
        }
        Ok(())
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn insert_new_lesson(&self, lesson: NewLessonRecord) -> Result<LessonId, StorageError> {
        let mut guard = self.lessons.lock().map_err(lock_err)?;
        if guard
            .values()
            .any(|l| l.course_id == lesson.course_id && l.order_index == lesson.order_index)
        {
            return Err(StorageError::Conflict);
        }
        let id = LessonId::new(next_id(&guard, LessonId::value));
        guard.insert(id, lesson.into_lesson(id));
        Ok(id)
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn lessons_for_course(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(lock_err)?;
        let mut lessons: Vec<Lesson> = guard
            .values()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        Ok(lessons)
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn insert_new_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError> {
        let mut guard = self.quizzes.lock().map_err(lock_err)?;
        let id = QuizId::new(next_id(&guard, QuizId::value));
        guard.insert(id, quiz.into_quiz(id));
        Ok(id)
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<i64, StorageError> {
        let mut guard = self.attempts.lock().map_err(lock_err)?;
        let id = i64::try_from(guard.len() + 1)
            .map_err(|_| StorageError::Serialization("attempt id overflow".into()))?;
        let mut record = AttemptRecord::from_attempt(attempt);
        record.id = Some(id);
        guard.push(record);
        Ok(id)
    }

    async fn attempts_for_user(
        &self,
        user_id: UserId,
        quiz_id: Option<QuizId>,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let guard = self.attempts.lock().map_err(lock_err)?;
        let mut attempts: Vec<AttemptRecord> = guard
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| quiz_id.is_none_or(|q| a.quiz_id == q))
            .cloned()
            .collect();
        attempts.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at).then(b.id.cmp(&a.id)));
        Ok(attempts)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        Ok(guard.get(&(user_id, lesson_id)).cloned())
    }

    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(lock_err)?;
        guard.insert(
            (progress.user_id, progress.lesson_id),
            progress.clone(),
        );
        Ok(())
    }

    async fn progress_for_user(
        &self,
        user_id: UserId,
        course_id: Option<CourseId>,
    ) -> Result<Vec<LessonProgress>, StorageError> {
        let course_lessons: Option<Vec<LessonId>> = match course_id {
            Some(course_id) => {
                let lessons = self.lessons.lock().map_err(lock_err)?;
                Some(
                    lessons
                        .values()
                        .filter(|l| l.course_id == course_id)
                        .map(|l| l.id)
                        .collect(),
                )
            }
            None => None,
        };

        let guard = self.progress.lock().map_err(lock_err)?;
        let mut records: Vec<LessonProgress> = guard
            .values()
            .filter(|p| p.user_id == user_id)
            .filter(|p| {
                course_lessons
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&p.lesson_id))
            })
            .cloned()
            .collect();
        records.sort_by_key(|p| p.lesson_id);
        Ok(records)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn insert_new_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let mut guard = self.enrollments.lock().map_err(lock_err)?;
        let key = (enrollment.user_id, enrollment.course_id);
        if guard.contains_key(&key) {
            return Err(StorageError::Conflict);
        }
        guard.insert(key, enrollment.clone());
        Ok(())
    }

    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StorageError> {
        let guard = self.enrollments.lock().map_err(lock_err)?;
        Ok(guard.get(&(user_id, course_id)).cloned())
    }

    async fn enrollments_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Enrollment>, StorageError> {
        let guard = self.enrollments.lock().map_err(lock_err)?;
        let mut enrollments: Vec<Enrollment> = guard
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| {
            a.enrolled_at
                .cmp(&b.enrolled_at)
                .then(a.course_id.cmp(&b.course_id))
        });
        Ok(enrollments)
    }

    async fn update_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let mut guard = self.enrollments.lock().map_err(lock_err)?;
        let key = (enrollment.user_id, enrollment.course_id);
        match guard.get_mut(&key) {
            Some(stored) => {
                *stored = enrollment.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            users: Arc::new(repo.clone()),
            courses: Arc::new(repo.clone()),
            lessons: Arc::new(repo.clone()),
            quizzes: Arc::new(repo.clone()),
            attempts: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            enrollments: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
