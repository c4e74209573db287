use std::fmt;

use chrono::{DateTime, Utc};
use lms_core::Clock;
use lms_core::model::{CourseId, Difficulty, Question, UserId};
use services::error::{CourseServiceError, ProgressServiceError, UserServiceError};
use services::{AppServices, NewCourse, NewLesson, NewQuiz, NewUser};
use storage::repository::StorageError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    email: String,
    password: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("LMS_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut email =
            std::env::var("LMS_SEED_EMAIL").unwrap_or_else(|_| "demo@example.com".into());
        let mut password =
            std::env::var("LMS_SEED_PASSWORD").unwrap_or_else(|_| "learn-something-123".into());
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--email" => {
                    email = require_value(&mut args, "--email")?;
                }
                "--password" => {
                    password = require_value(&mut args, "--password")?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    now = Some(
                        DateTime::parse_from_rfc3339(&value)
                            .map(|t| t.with_timezone(&Utc))
                            .map_err(|_| ArgsError::InvalidNow { raw: value })?,
                    );
                }
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(ArgsError::UnknownArg(other.to_owned())),
            }
        }

        Ok(Self {
            db_url,
            email,
            password,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p services --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --email <email>           Demo account email (default: demo@example.com)");
    eprintln!("  --password <password>     Demo account password");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LMS_DB_URL, LMS_SEED_EMAIL, LMS_SEED_PASSWORD");
}

async fn seed_user(app: &AppServices, args: &Args) -> Result<UserId, Box<dyn std::error::Error>> {
    let created = app
        .users()
        .create_user(NewUser {
            email: args.email.clone(),
            password: args.password.clone(),
            first_name: "Demo".into(),
            last_name: "User".into(),
            avatar_url: None,
        })
        .await;

    match created {
        Ok(id) => Ok(id),
        Err(UserServiceError::EmailTaken) => {
            tracing::info!(email = %args.email, "demo user already present");
            let user = app
                .users()
                .login(&args.email, &args.password)
                .await?;
            Ok(user.id)
        }
        Err(e) => Err(e.into()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = args.now.map_or(Clock::Default, Clock::fixed);
    let app = AppServices::new_sqlite(&args.db_url, clock).await?;

    let user_id = seed_user(&app, &args).await?;

    let course_id: CourseId = match app
        .courses()
        .create_course(NewCourse {
            title: "Introduction to Learning".into(),
            description: "A short course on finding your way around the platform: \
                          navigating lessons, completing quizzes, and tracking progress."
                .into(),
            slug: "introduction-to-learning".into(),
            thumbnail_url: None,
            difficulty: Difficulty::Beginner,
            estimated_duration_mins: 60,
            category: "Getting Started".into(),
            order_index: 0,
        })
        .await
    {
        Ok(id) => id,
        Err(CourseServiceError::Storage(StorageError::Conflict)) => {
            tracing::info!("sample course already present, nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    app.courses().publish_course(course_id).await?;

    let _welcome = app
        .lessons()
        .create_lesson(NewLesson {
            course_id,
            title: "Welcome to the Platform".into(),
            description: "Get familiar with the interface and features.".into(),
            slug: "welcome-to-the-platform".into(),
            video_url: Some("https://videos.example.com/welcome.mp4".into()),
            video_duration_secs: Some(300),
            text_content: Some(
                "Welcome! Explore the interface and get comfortable with the layout.".into(),
            ),
            code_examples: None,
            order_index: 0,
        })
        .await?;

    let how_to = app
        .lessons()
        .create_lesson(NewLesson {
            course_id,
            title: "How to Complete Lessons".into(),
            description: "The lesson-completion and progress-tracking flow.".into(),
            slug: "how-to-complete-lessons".into(),
            video_url: Some("https://videos.example.com/complete-lessons.mp4".into()),
            video_duration_secs: Some(480),
            text_content: Some(
                "Watch the video, read the materials, then mark the lesson complete \
                 to record your progress."
                    .into(),
            ),
            code_examples: Some(r#"{"example1": "println!(\"hello, learning\");"}"#.into()),
            order_index: 1,
        })
        .await?;

    let quiz_id = app
        .quizzes()
        .create_quiz(NewQuiz {
            lesson_id: how_to,
            title: "Lesson Completion Quiz".into(),
            questions: vec![
                Question::new(
                    "What should you do after watching a lesson video?",
                    vec![
                        "Close the browser immediately".into(),
                        "Read supplementary materials and practice examples".into(),
                        "Skip to the next course".into(),
                        "Nothing else is needed".into(),
                    ],
                    1,
                )?,
                Question::new(
                    "How do you track your progress in a lesson?",
                    vec![
                        "By taking notes only".into(),
                        "By marking the lesson as complete".into(),
                        "By watching the video twice".into(),
                        "Progress is tracked automatically".into(),
                    ],
                    1,
                )?,
            ],
            passing_score: 70,
        })
        .await?;

    match app.progress().enroll(user_id, course_id).await {
        Ok(_) => {}
        Err(ProgressServiceError::AlreadyEnrolled) => {
            tracing::info!(user_id = %user_id, "demo user already enrolled");
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        user_id = %user_id,
        course_id = %course_id,
        quiz_id = %quiz_id,
        db_url = %args.db_url,
        "seeded demo user, sample course, lessons, and quiz"
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
