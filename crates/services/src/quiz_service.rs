use std::sync::Arc;

use lms_core::model::{LessonId, Question, Quiz, QuizAttempt, QuizId, UserId};
use lms_core::progress::{parse_answers, score_quiz};
use storage::repository::{
    AttemptRecord, AttemptRepository, LessonRepository, NewQuizRecord, QuizRepository,
    StorageError,
};

use crate::Clock;
use crate::error::QuizServiceError;

/// Input for attaching a quiz to a lesson.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub lesson_id: LessonId,
    pub title: String,
    pub questions: Vec<Question>,
    pub passing_score: u8,
}

/// Result of a persisted submission: the immutable attempt and its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAttempt {
    pub attempt_id: i64,
    pub attempt: QuizAttempt,
}

/// Orchestrates quiz creation, submission scoring, and attempt history.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    lessons: Arc<dyn LessonRepository>,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        lessons: Arc<dyn LessonRepository>,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            lessons,
            quizzes,
            attempts,
        }
    }

    /// Validate and persist a new quiz under an existing lesson.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` with `NotFound` when the parent
    /// lesson does not exist.
    /// Returns `QuizServiceError::Quiz` for validation failures.
    pub async fn create_quiz(&self, input: NewQuiz) -> Result<QuizId, QuizServiceError> {
        self.lessons
            .get_lesson(input.lesson_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let now = self.clock.now();
        let quiz = Quiz::new(
            QuizId::new(0),
            input.lesson_id,
            input.title,
            input.questions,
            input.passing_score,
            now,
        )?;

        let quiz_id = self
            .quizzes
            .insert_new_quiz(NewQuizRecord::from_quiz(&quiz))
            .await?;
        Ok(quiz_id)
    }

    /// Score a raw submission and record the attempt.
    ///
    /// The payload is JSON text straight from the client: an array of
    /// zero-based option indexes aligned with the quiz's questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` with `NotFound` when the quiz does
    /// not exist, `QuizServiceError::Scoring` when the payload does not parse,
    /// and `QuizServiceError::Storage` if persistence fails.
    pub async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        user_id: UserId,
        raw_answers: &str,
    ) -> Result<RecordedAttempt, QuizServiceError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let answers = parse_answers(raw_answers)?;
        let score = score_quiz(&quiz, &answers);

        let attempt =
            QuizAttempt::from_score(user_id, quiz_id, answers, score, self.clock.now());
        let attempt_id = self.attempts.record_attempt(&attempt).await?;

        tracing::info!(
            quiz_id = %quiz_id,
            user_id = %user_id,
            score = attempt.score,
            passed = attempt.passed,
            "quiz attempt recorded"
        );

        Ok(RecordedAttempt {
            attempt_id,
            attempt,
        })
    }

    /// A user's attempt history, newest first, optionally for one quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn attempts_for_user(
        &self,
        user_id: UserId,
        quiz_id: Option<QuizId>,
    ) -> Result<Vec<AttemptRecord>, QuizServiceError> {
        let attempts = self.attempts.attempts_for_user(user_id, quiz_id).await?;
        Ok(attempts)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
