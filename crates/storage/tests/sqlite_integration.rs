use chrono::Duration;
use lms_core::model::{
    Course, CourseId, Difficulty, Enrollment, Lesson, LessonId, LessonProgress, Question, Quiz,
    QuizAttempt, QuizId, User, UserId,
};
use lms_core::time::fixed_now;
use storage::repository::{
    AttemptRepository, CourseRepository, EnrollmentRepository, LessonRepository, NewCourseRecord,
    NewLessonRecord, NewQuizRecord, NewUserRecord, ProgressRepository, QuizRepository,
    StorageError, UserRepository,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn build_user(email: &str) -> NewUserRecord {
    let user = User::new(
        UserId::new(1),
        email,
        "$argon2id$v=19$m=19456,t=2,p=1$stubsalt$stubhash",
        "Demo",
        "User",
        None,
        fixed_now(),
    )
    .unwrap();
    NewUserRecord::from_user(&user)
}

fn build_course(slug: &str, category: &str, order_index: u32) -> NewCourseRecord {
    let course = Course::new(
        CourseId::new(1),
        "Introduction to Learning",
        "Find your way around the platform.",
        slug,
        None,
        Difficulty::Beginner,
        60,
        category,
        order_index,
        fixed_now(),
    )
    .unwrap();
    NewCourseRecord::from_course(&course)
}

fn build_lesson(course_id: CourseId, order_index: u32) -> NewLessonRecord {
    let lesson = Lesson::new(
        LessonId::new(1),
        course_id,
        format!("Lesson {order_index}"),
        "",
        format!("lesson-{order_index}"),
        Some("https://videos.example.com/intro.mp4".to_owned()),
        Some(300),
        Some("Welcome aboard.".to_owned()),
        None,
        order_index,
        fixed_now(),
    )
    .unwrap();
    NewLessonRecord::from_lesson(&lesson)
}

fn build_quiz(lesson_id: LessonId) -> NewQuizRecord {
    let quiz = Quiz::new(
        QuizId::new(1),
        lesson_id,
        "Lesson Completion Quiz",
        vec![
            Question::new(
                "What should you do when you finish a lesson?",
                vec![
                    "Close the tab".into(),
                    "Mark it complete".into(),
                    "Start over".into(),
                ],
                1,
            )
            .unwrap(),
            Question::new(
                "Where does your progress show up?",
                vec!["Nowhere".into(), "On the course".into()],
                1,
            )
            .unwrap(),
        ],
        50,
        fixed_now(),
    )
    .unwrap();
    NewQuizRecord::from_quiz(&quiz)
}

#[tokio::test]
async fn user_roundtrip_and_unique_email() {
    let repo = connect("memdb_users").await;

    let id = repo
        .insert_new_user(build_user("demo@example.com"))
        .await
        .unwrap();

    let fetched = repo
        .find_user_by_email("demo@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(fetched.id, id);
    assert!(fetched.is_active);
    assert_eq!(fetched.last_login, None);
    assert_eq!(fetched.created_at, fixed_now());

    let err = repo
        .insert_new_user(build_user("demo@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    repo.record_login(id, fixed_now() + Duration::hours(1))
        .await
        .unwrap();
    let fetched = repo.get_user(id).await.unwrap().unwrap();
    assert_eq!(fetched.last_login, Some(fixed_now() + Duration::hours(1)));
}

#[tokio::test]
async fn record_login_for_missing_user_is_not_found() {
    let repo = connect("memdb_login_missing").await;
    let err = repo
        .record_login(UserId::new(99), fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn published_courses_are_filtered_and_ordered() {
    let repo = connect("memdb_courses").await;

    let zeta = repo
        .insert_new_course(build_course("zeta", "basics", 1))
        .await
        .unwrap();
    let alpha = repo
        .insert_new_course(build_course("alpha", "advanced", 0))
        .await
        .unwrap();
    let draft = repo
        .insert_new_course(build_course("draft", "basics", 0))
        .await
        .unwrap();

    repo.set_course_published(zeta, true).await.unwrap();
    repo.set_course_published(alpha, true).await.unwrap();

    let listed = repo.list_published_courses().await.unwrap();
    let slugs: Vec<&str> = listed.iter().map(Course::slug).collect();
    assert_eq!(slugs, vec!["alpha", "zeta"]);
    assert!(listed.iter().all(|c| c.id() != draft));

    let err = repo
        .set_course_published(CourseId::new(404), true)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn lessons_keep_course_order_and_unique_index() {
    let repo = connect("memdb_lessons").await;
    let course_id = repo
        .insert_new_course(build_course("c", "basics", 0))
        .await
        .unwrap();

    for order_index in [1u32, 0] {
        repo.insert_new_lesson(build_lesson(course_id, order_index))
            .await
            .unwrap();
    }

    let lessons = repo.lessons_for_course(course_id).await.unwrap();
    let order: Vec<u32> = lessons.iter().map(|l| l.order_index).collect();
    assert_eq!(order, vec![0, 1]);
    assert_eq!(lessons[0].video_duration_secs, Some(300));

    let err = repo
        .insert_new_lesson(build_lesson(course_id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
}

#[tokio::test]
async fn quiz_questions_survive_the_json_column() {
    let repo = connect("memdb_quiz").await;
    let course_id = repo
        .insert_new_course(build_course("c", "basics", 0))
        .await
        .unwrap();
    let lesson_id = repo
        .insert_new_lesson(build_lesson(course_id, 0))
        .await
        .unwrap();

    let record = build_quiz(lesson_id);
    let expected = record.questions.clone();
    let quiz_id = repo.insert_new_quiz(record).await.unwrap();

    let quiz = repo.get_quiz(quiz_id).await.unwrap().expect("quiz");
    assert_eq!(quiz.lesson_id, lesson_id);
    assert_eq!(quiz.questions, expected);
    assert_eq!(quiz.passing_score, 50);

    assert!(repo.get_quiz(QuizId::new(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn progress_upsert_is_one_row_per_pair() {
    let repo = connect("memdb_progress").await;
    let user_id = repo
        .insert_new_user(build_user("demo@example.com"))
        .await
        .unwrap();
    let course_id = repo
        .insert_new_course(build_course("c", "basics", 0))
        .await
        .unwrap();
    let lesson_id = repo
        .insert_new_lesson(build_lesson(course_id, 0))
        .await
        .unwrap();

    let mut record = LessonProgress::started(user_id, lesson_id);
    record.complete(Some(120), fixed_now());
    repo.upsert_progress(&record).await.unwrap();

    record.complete(Some(240), fixed_now() + Duration::minutes(30));
    repo.upsert_progress(&record).await.unwrap();

    let records = repo.progress_for_user(user_id, None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_completed);
    assert_eq!(records[0].watch_time_secs, 240);
    assert_eq!(
        records[0].completed_at,
        Some(fixed_now() + Duration::minutes(30))
    );
}

#[tokio::test]
async fn progress_filter_joins_through_lessons() {
    let repo = connect("memdb_progress_filter").await;
    let user_id = repo
        .insert_new_user(build_user("demo@example.com"))
        .await
        .unwrap();
    let course_a = repo
        .insert_new_course(build_course("a", "basics", 0))
        .await
        .unwrap();
    let course_b = repo
        .insert_new_course(build_course("b", "basics", 1))
        .await
        .unwrap();
    let lesson_a = repo
        .insert_new_lesson(build_lesson(course_a, 0))
        .await
        .unwrap();
    let lesson_b = repo
        .insert_new_lesson(build_lesson(course_b, 0))
        .await
        .unwrap();

    for lesson_id in [lesson_a, lesson_b] {
        let mut record = LessonProgress::started(user_id, lesson_id);
        record.complete(None, fixed_now());
        repo.upsert_progress(&record).await.unwrap();
    }

    let all = repo.progress_for_user(user_id, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_a = repo
        .progress_for_user(user_id, Some(course_a))
        .await
        .unwrap();
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].lesson_id, lesson_a);
}

#[tokio::test]
async fn enrollment_conflict_and_progress_update() {
    let repo = connect("memdb_enrollments").await;
    let user_id = repo
        .insert_new_user(build_user("demo@example.com"))
        .await
        .unwrap();
    let course_id = repo
        .insert_new_course(build_course("c", "basics", 0))
        .await
        .unwrap();

    let mut enrollment = Enrollment::new(user_id, course_id, fixed_now());
    repo.insert_new_enrollment(&enrollment).await.unwrap();

    let err = repo.insert_new_enrollment(&enrollment).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    enrollment.progress_percent = 50;
    enrollment.last_accessed_at = Some(fixed_now() + Duration::days(1));
    repo.update_enrollment(&enrollment).await.unwrap();

    let fetched = repo
        .get_enrollment(user_id, course_id)
        .await
        .unwrap()
        .expect("enrollment");
    assert_eq!(fetched.progress_percent, 50);
    assert!(!fetched.is_completed);
    assert_eq!(
        fetched.last_accessed_at,
        Some(fixed_now() + Duration::days(1))
    );

    let listed = repo.enrollments_for_user(user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].course_id, course_id);
}

#[tokio::test]
async fn attempts_round_trip_newest_first() {
    let repo = connect("memdb_attempts").await;
    let user_id = repo
        .insert_new_user(build_user("demo@example.com"))
        .await
        .unwrap();
    let course_id = repo
        .insert_new_course(build_course("c", "basics", 0))
        .await
        .unwrap();
    let lesson_id = repo
        .insert_new_lesson(build_lesson(course_id, 0))
        .await
        .unwrap();
    let quiz_id = repo.insert_new_quiz(build_quiz(lesson_id)).await.unwrap();

    for (offset, score, passed) in [(0i64, 0u8, false), (1, 100, true)] {
        let at = fixed_now() + Duration::hours(offset);
        let attempt = QuizAttempt {
            user_id,
            quiz_id,
            answers: vec![1, 1],
            score,
            passed,
            attempted_at: at,
            completed_at: Some(at),
        };
        let id = repo.record_attempt(&attempt).await.unwrap();
        assert!(id > 0);
    }

    let attempts = repo
        .attempts_for_user(user_id, Some(quiz_id))
        .await
        .unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].score, 100);
    assert!(attempts[0].passed);
    assert_eq!(attempts[0].answers, vec![1, 1]);
    assert_eq!(attempts[1].score, 0);

    let none = repo
        .attempts_for_user(user_id, Some(QuizId::new(404)))
        .await
        .unwrap();
    assert!(none.is_empty());
}
