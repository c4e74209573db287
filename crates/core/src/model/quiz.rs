use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LessonId, QuizId, UserId};
use crate::progress::QuizScore;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz must have at least one question")]
    NoQuestions,

    #[error("passing score must be between 0 and 100, got {0}")]
    InvalidPassingScore(u8),

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} is outside the {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question.
///
/// Serialized as JSON inside the quiz's `questions` column, so the field
/// names are part of the stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl Question {
    /// Creates a question after checking the answer key points at a real option.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyPrompt`, `TooFewOptions`, or
    /// `CorrectAnswerOutOfRange`.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuizError::TooFewOptions(options.len()));
        }
        if correct_answer >= options.len() {
            return Err(QuizError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
        })
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A quiz attached to a lesson: ordered questions plus a passing threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: QuizId,
    pub lesson_id: LessonId,
    pub title: String,
    pub questions: Vec<Question>,
    pub passing_score: u8,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// Creates a quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle`, `NoQuestions`, or
    /// `InvalidPassingScore` when the threshold exceeds 100.
    pub fn new(
        id: QuizId,
        lesson_id: LessonId,
        title: impl Into<String>,
        questions: Vec<Question>,
        passing_score: u8,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if passing_score > 100 {
            return Err(QuizError::InvalidPassingScore(passing_score));
        }

        Ok(Self {
            id,
            lesson_id,
            title,
            questions,
            passing_score,
            created_at,
        })
    }
}

//
// ─── QUIZ ATTEMPT ──────────────────────────────────────────────────────────────
//

/// Immutable record of one scored submission against a quiz.
///
/// Attempts are only built from a computed [`QuizScore`], so the
/// `passed == (score >= passing_score)` invariant holds by construction and
/// there is no update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    pub user_id: UserId,
    pub quiz_id: QuizId,
    pub answers: Vec<i64>,
    pub score: u8,
    pub passed: bool,
    pub attempted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    #[must_use]
    pub fn from_score(
        user_id: UserId,
        quiz_id: QuizId,
        answers: Vec<i64>,
        score: QuizScore,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            quiz_id,
            answers,
            score: score.percent,
            passed: score.passed,
            attempted_at,
            completed_at: Some(attempted_at),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn opts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn question_rejects_out_of_range_answer_key() {
        let err = Question::new("2 + 2?", opts(4), 4).unwrap_err();
        assert_eq!(
            err,
            QuizError::CorrectAnswerOutOfRange {
                index: 4,
                options: 4
            }
        );
    }

    #[test]
    fn question_rejects_single_option() {
        let err = Question::new("2 + 2?", opts(1), 0).unwrap_err();
        assert_eq!(err, QuizError::TooFewOptions(1));
    }

    #[test]
    fn question_serializes_with_stored_field_names() {
        let q = Question::new("2 + 2?", vec!["3".into(), "4".into()], 1).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["question"], "2 + 2?");
        assert_eq!(json["correct_answer"], 1);
    }

    #[test]
    fn quiz_rejects_passing_score_over_100() {
        let q = Question::new("2 + 2?", opts(3), 0).unwrap();
        let err = Quiz::new(
            QuizId::new(1),
            LessonId::new(1),
            "Arithmetic",
            vec![q],
            101,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::InvalidPassingScore(101));
    }

    #[test]
    fn quiz_rejects_empty_question_list() {
        let err = Quiz::new(
            QuizId::new(1),
            LessonId::new(1),
            "Arithmetic",
            vec![],
            50,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn attempt_preserves_score_invariant() {
        let score = QuizScore {
            percent: 50,
            passed: true,
        };
        let attempt = QuizAttempt::from_score(
            UserId::new(1),
            QuizId::new(2),
            vec![1, 0],
            score,
            fixed_now(),
        );
        assert_eq!(attempt.score, 50);
        assert!(attempt.passed);
        assert_eq!(attempt.completed_at, Some(fixed_now()));
    }
}
