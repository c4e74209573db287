use lms_core::model::{Quiz, QuizId};

use super::SqliteRepository;
use super::mapping::{db_err, encode_questions, map_quiz_row, quiz_id_from_i64, u64_to_i64};
use crate::repository::{NewQuizRecord, QuizRepository, StorageError};

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn insert_new_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError> {
        let questions = encode_questions(&quiz.questions)?;

        let res = sqlx::query(
            r"
            INSERT INTO quizzes (lesson_id, title, questions, passing_score, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(u64_to_i64("lesson_id", quiz.lesson_id.value())?)
        .bind(quiz.title)
        .bind(questions)
        .bind(i64::from(quiz.passing_score))
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        quiz_id_from_i64(res.last_insert_rowid())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, lesson_id, title, questions, passing_score, created_at
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(u64_to_i64("id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_quiz_row(&row).map(Some),
            None => Ok(None),
        }
    }
}
