use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Lesson, LessonProgress, Quiz};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("answers payload is not a JSON array of integers: {0}")]
    MalformedAnswers(String),
}

//
// ─── QUIZ SCORING ──────────────────────────────────────────────────────────────
//

/// Result of scoring one submission against a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    /// Rounded percentage of questions answered correctly, 0-100.
    pub percent: u8,
    /// Whether `percent` met the quiz's passing threshold.
    pub passed: bool,
}

/// Parses a raw submitted-answers payload into option indexes.
///
/// The payload is stored and transported as JSON text; anything other than
/// an array of integers is a data-integrity failure, not something to
/// repair.
///
/// # Errors
///
/// Returns `ScoringError::MalformedAnswers` when the payload does not parse.
pub fn parse_answers(raw: &str) -> Result<Vec<i64>, ScoringError> {
    serde_json::from_str::<Vec<i64>>(raw)
        .map_err(|e| ScoringError::MalformedAnswers(e.to_string()))
}

/// Scores a submission against a quiz.
///
/// Answers align positionally with the quiz's questions. A question counts
/// as correct only when an answer exists at its index and equals the
/// correct-option index; missing, surplus, negative, or out-of-range answers
/// are simply wrong. An empty quiz scores 0, and passes only if the
/// threshold is 0.
///
/// ```
/// # use lms_core::model::{LessonId, Question, Quiz, QuizId};
/// # use lms_core::progress::score_quiz;
/// # use lms_core::time::fixed_now;
/// let questions = vec![
///     Question::new("2 + 2?", vec!["3".into(), "4".into(), "5".into()], 1).unwrap(),
///     Question::new("Capital of France?", vec!["London".into(), "Berlin".into(), "Paris".into()], 2).unwrap(),
/// ];
/// let quiz = Quiz::new(QuizId::new(1), LessonId::new(1), "Warmup", questions, 50, fixed_now()).unwrap();
///
/// let score = score_quiz(&quiz, &[1, 0]);
/// assert_eq!(score.percent, 50);
/// assert!(score.passed);
/// ```
#[must_use]
pub fn score_quiz(quiz: &Quiz, answers: &[i64]) -> QuizScore {
    let total = quiz.questions.len();
    let correct = quiz
        .questions
        .iter()
        .enumerate()
        .filter(|(i, q)| {
            i64::try_from(q.correct_answer).is_ok_and(|key| answers.get(*i) == Some(&key))
        })
        .count();

    let percent = round_percent(correct, total);
    QuizScore {
        percent,
        passed: percent >= quiz.passing_score,
    }
}

//
// ─── COURSE AGGREGATION ────────────────────────────────────────────────────────
//

/// Aggregate completion state for one (user, course) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseProgress {
    /// Rounded percentage of the course's lessons completed, 0-100.
    pub percent: u8,
    /// True only when every lesson is complete and the course has lessons.
    pub completed: bool,
}

/// Derives aggregate progress from a course's lessons and a user's
/// per-lesson records.
///
/// `lessons` is the full lesson set for one course, published or not;
/// publication state does not affect progress. `records` is the user's
/// progress rows for that course; rows for other lessons are ignored. A
/// course with zero lessons reports 0% and is never completed.
#[must_use]
pub fn aggregate_course_progress(
    lessons: &[Lesson],
    records: &[LessonProgress],
) -> CourseProgress {
    let done: HashSet<_> = records
        .iter()
        .filter(|r| r.is_completed)
        .map(|r| r.lesson_id)
        .collect();

    let total = lessons.len();
    let completed = lessons.iter().filter(|l| done.contains(&l.id)).count();

    CourseProgress {
        percent: round_percent(completed, total),
        completed: total > 0 && completed == total,
    }
}

/// Rounded integer percentage, half away from zero; 0 for an empty total.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn round_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Counts are bounded by question/lesson list sizes, far below f64's
    // integer precision limit.
    ((part as f64 / total as f64) * 100.0).round() as u8
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
