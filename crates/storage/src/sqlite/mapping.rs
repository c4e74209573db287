use lms_core::model::{
    Course, CourseId, Difficulty, Enrollment, Lesson, LessonId, LessonProgress, Question, Quiz,
    QuizId, User, UserId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{AttemptRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps a sqlx error, turning unique-constraint violations into `Conflict`.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn lesson_id_from_i64(v: i64) -> Result<LessonId, StorageError> {
    Ok(LessonId::new(i64_to_u64("lesson_id", v)?))
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    Ok(QuizId::new(i64_to_u64("quiz_id", v)?))
}

fn u32_col(row: &SqliteRow, field: &'static str) -> Result<u32, StorageError> {
    let raw: i64 = row.try_get(field).map_err(ser)?;
    u32::try_from(raw).map_err(|_| StorageError::Serialization(format!("invalid {field}: {raw}")))
}

fn opt_u32_col(row: &SqliteRow, field: &'static str) -> Result<Option<u32>, StorageError> {
    let raw: Option<i64> = row.try_get(field).map_err(ser)?;
    raw.map(|v| {
        u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
    })
    .transpose()
}

fn bool_col(row: &SqliteRow, field: &'static str) -> Result<bool, StorageError> {
    Ok(row.try_get::<i64, _>(field).map_err(ser)? != 0)
}

fn percent_col(row: &SqliteRow, field: &'static str) -> Result<u8, StorageError> {
    let raw: i64 = row.try_get(field).map_err(ser)?;
    match u8::try_from(raw) {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(StorageError::Serialization(format!(
            "invalid {field}: {raw}"
        ))),
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Storage encoding mirrors the lowercase difficulty labels.
pub(crate) fn difficulty_to_str(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "beginner",
        Difficulty::Intermediate => "intermediate",
        Difficulty::Advanced => "advanced",
    }
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    match s {
        "beginner" => Ok(Difficulty::Beginner),
        "intermediate" => Ok(Difficulty::Intermediate),
        "advanced" => Ok(Difficulty::Advanced),
        _ => Err(StorageError::Serialization(format!(
            "invalid difficulty: {s}"
        ))),
    }
}

//
// ─── JSON COLUMNS ──────────────────────────────────────────────────────────────
//

pub(crate) fn encode_questions(questions: &[Question]) -> Result<String, StorageError> {
    serde_json::to_string(questions).map_err(ser)
}

pub(crate) fn decode_questions(raw: &str) -> Result<Vec<Question>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn encode_answers(answers: &[i64]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn decode_answers(raw: &str) -> Result<Vec<i64>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

//
// ─── ROW MAPPERS ───────────────────────────────────────────────────────────────
//

pub(crate) fn map_user_row(row: &SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: user_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        email: row.try_get("email").map_err(ser)?,
        password_hash: row.try_get("password_hash").map_err(ser)?,
        first_name: row.try_get("first_name").map_err(ser)?,
        last_name: row.try_get("last_name").map_err(ser)?,
        avatar_url: row.try_get("avatar_url").map_err(ser)?,
        is_active: bool_col(row, "is_active")?,
        last_login: row.try_get("last_login").map_err(ser)?,
        current_streak: u32_col(row, "current_streak")?,
        longest_streak: u32_col(row, "longest_streak")?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    let difficulty_str: String = row.try_get("difficulty").map_err(ser)?;
    Ok(Course::from_persisted(
        course_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get("title").map_err(ser)?,
        row.try_get("description").map_err(ser)?,
        row.try_get("slug").map_err(ser)?,
        row.try_get("thumbnail_url").map_err(ser)?,
        parse_difficulty(&difficulty_str)?,
        u32_col(row, "estimated_duration_mins")?,
        bool_col(row, "is_published")?,
        row.try_get("category").map_err(ser)?,
        u32_col(row, "order_index")?,
        row.try_get("created_at").map_err(ser)?,
    ))
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    Ok(Lesson {
        id: lesson_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        course_id: course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        slug: row.try_get("slug").map_err(ser)?,
        video_url: row.try_get("video_url").map_err(ser)?,
        video_duration_secs: opt_u32_col(row, "video_duration_secs")?,
        text_content: row.try_get("text_content").map_err(ser)?,
        code_examples: row.try_get("code_examples").map_err(ser)?,
        order_index: u32_col(row, "order_index")?,
        is_published: bool_col(row, "is_published")?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<Quiz, StorageError> {
    let questions_raw: String = row.try_get("questions").map_err(ser)?;
    Ok(Quiz {
        id: quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        lesson_id: lesson_id_from_i64(row.try_get::<i64, _>("lesson_id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        questions: decode_questions(&questions_raw)?,
        passing_score: percent_col(row, "passing_score")?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_attempt_row(row: &SqliteRow) -> Result<AttemptRecord, StorageError> {
    let answers_raw: String = row.try_get("answers").map_err(ser)?;
    Ok(AttemptRecord {
        id: Some(row.try_get("id").map_err(ser)?),
        user_id: user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        quiz_id: quiz_id_from_i64(row.try_get::<i64, _>("quiz_id").map_err(ser)?)?,
        answers: decode_answers(&answers_raw)?,
        score: percent_col(row, "score")?,
        passed: bool_col(row, "is_passed")?,
        attempted_at: row.try_get("attempted_at").map_err(ser)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<LessonProgress, StorageError> {
    Ok(LessonProgress {
        user_id: user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        lesson_id: lesson_id_from_i64(row.try_get::<i64, _>("lesson_id").map_err(ser)?)?,
        is_completed: bool_col(row, "is_completed")?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
        watch_time_secs: u32_col(row, "watch_time_secs")?,
    })
}

pub(crate) fn map_enrollment_row(row: &SqliteRow) -> Result<Enrollment, StorageError> {
    Ok(Enrollment {
        user_id: user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        course_id: course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?,
        enrolled_at: row.try_get("enrolled_at").map_err(ser)?,
        progress_percent: percent_col(row, "progress_percentage")?,
        is_completed: bool_col(row, "is_completed")?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
        last_accessed_at: row.try_get("last_accessed_at").map_err(ser)?,
    })
}
