use chrono::{DateTime, Utc};

use crate::model::ids::{CourseId, LessonId, UserId};
use crate::progress::CourseProgress;

//
// ─── LESSON PROGRESS ───────────────────────────────────────────────────────────
//

/// Per-(user, lesson) completion state and accumulated watch time.
///
/// Storage keeps at most one row per pair; repeated completion calls mutate
/// the existing record. Completion is one-way: there is no way to flip
/// `is_completed` back to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonProgress {
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub watch_time_secs: u32,
}

impl LessonProgress {
    /// A fresh, not-yet-completed record for the pair.
    #[must_use]
    pub fn started(user_id: UserId, lesson_id: LessonId) -> Self {
        Self {
            user_id,
            lesson_id,
            is_completed: false,
            completed_at: None,
            watch_time_secs: 0,
        }
    }

    /// Marks the lesson complete, refreshing the completion timestamp.
    ///
    /// `watch_time_secs` replaces the stored watch time when given
    /// (including an explicit 0); `None` keeps the current value.
    pub fn complete(&mut self, watch_time_secs: Option<u32>, now: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(now);
        if let Some(secs) = watch_time_secs {
            self.watch_time_secs = secs;
        }
    }
}

//
// ─── ENROLLMENT ────────────────────────────────────────────────────────────────
//

/// Links a user to a course they are taking and carries the aggregate
/// progress derived from their lesson completions.
///
/// At most one enrollment exists per (user, course); storage rejects
/// duplicates instead of merging them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    pub progress_percent: u8,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// A brand-new enrollment at 0% progress.
    #[must_use]
    pub fn new(user_id: UserId, course_id: CourseId, enrolled_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            course_id,
            enrolled_at,
            progress_percent: 0,
            is_completed: false,
            completed_at: None,
            last_accessed_at: None,
        }
    }

    /// Writes a freshly computed course aggregate into the enrollment.
    ///
    /// The completed flag latches: once true it stays true even if a later
    /// aggregate reports less than 100% (no un-completion path is modeled).
    pub fn apply_progress(&mut self, progress: CourseProgress, now: DateTime<Utc>) {
        self.progress_percent = progress.percent;
        self.last_accessed_at = Some(now);
        if progress.completed && !self.is_completed {
            self.is_completed = true;
            self.completed_at = Some(now);
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
    use chrono::Duration;

    #[test]
    fn started_record_is_incomplete() {
        let rec = LessonProgress::started(UserId::new(1), LessonId::new(2));
        assert!(!rec.is_completed);
        assert_eq!(rec.completed_at, None);
        assert_eq!(rec.watch_time_secs, 0);
    }

    #[test]
    fn complete_sets_flag_and_timestamp() {
        let mut rec = LessonProgress::started(UserId::new(1), LessonId::new(2));
        rec.complete(Some(300), fixed_now());
        assert!(rec.is_completed);
        assert_eq!(rec.completed_at, Some(fixed_now()));
        assert_eq!(rec.watch_time_secs, 300);
    }

    #[test]
    fn repeat_completion_updates_watch_time_and_timestamp_only() {
        let mut rec = LessonProgress::started(UserId::new(1), LessonId::new(2));
        rec.complete(Some(300), fixed_now());

        let later = fixed_now() + Duration::hours(1);
        rec.complete(Some(450), later);
        assert!(rec.is_completed);
        assert_eq!(rec.watch_time_secs, 450);
        assert_eq!(rec.completed_at, Some(later));
    }

    #[test]
    fn completion_without_watch_time_keeps_existing_value() {
        let mut rec = LessonProgress::started(UserId::new(1), LessonId::new(2));
        rec.complete(Some(300), fixed_now());
        rec.complete(None, fixed_now());
        assert_eq!(rec.watch_time_secs, 300);
    }

    #[test]
    fn explicit_zero_watch_time_overwrites() {
        let mut rec = LessonProgress::started(UserId::new(1), LessonId::new(2));
        rec.complete(Some(300), fixed_now());
        rec.complete(Some(0), fixed_now());
        assert_eq!(rec.watch_time_secs, 0);
    }

    #[test]
    fn new_enrollment_starts_at_zero() {
        let enr = Enrollment::new(UserId::new(1), CourseId::new(3), fixed_now());
        assert_eq!(enr.progress_percent, 0);
        assert!(!enr.is_completed);
        assert_eq!(enr.last_accessed_at, None);
    }

    #[test]
    fn apply_progress_records_percent_and_access_time() {
        let mut enr = Enrollment::new(UserId::new(1), CourseId::new(3), fixed_now());
        let now = fixed_now() + Duration::days(1);
        enr.apply_progress(
            CourseProgress {
                percent: 50,
                completed: false,
            },
            now,
        );
        assert_eq!(enr.progress_percent, 50);
        assert!(!enr.is_completed);
        assert_eq!(enr.last_accessed_at, Some(now));
        assert_eq!(enr.completed_at, None);
    }

    #[test]
    fn completion_latches_on_full_progress() {
        let mut enr = Enrollment::new(UserId::new(1), CourseId::new(3), fixed_now());
        let done_at = fixed_now() + Duration::days(2);
        enr.apply_progress(
            CourseProgress {
                percent: 100,
                completed: true,
            },
            done_at,
        );
        assert!(enr.is_completed);
        assert_eq!(enr.completed_at, Some(done_at));

        // A later aggregate does not reset the latch or its timestamp.
        let later = done_at + Duration::days(1);
        enr.apply_progress(
            CourseProgress {
                percent: 100,
                completed: true,
            },
            later,
        );
        assert!(enr.is_completed);
        assert_eq!(enr.completed_at, Some(done_at));
        assert_eq!(enr.last_accessed_at, Some(later));
    }
}
