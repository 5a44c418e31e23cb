//! Lesson pass/fail policy and enrollment progress rules.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Enrollment status values stored in `enrollments.status`.
pub const ENROLLMENT_ACTIVE: &str = "active";
pub const ENROLLMENT_COMPLETED: &str = "completed";

/// All valid enrollment status values.
pub const VALID_ENROLLMENT_STATUSES: &[&str] = &[ENROLLMENT_ACTIVE, ENROLLMENT_COMPLETED];

/// Upper bound on a single reported time-spent value (24 hours).
pub const MAX_TIME_SPENT_SECS: i32 = 86_400;

// ---------------------------------------------------------------------------
// Enrollment status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Completed,
}

impl EnrollmentStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ENROLLMENT_ACTIVE => Ok(Self::Active),
            ENROLLMENT_COMPLETED => Ok(Self::Completed),
            _ => Err(format!(
                "Invalid enrollment status '{s}'. Must be one of: {}",
                VALID_ENROLLMENT_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => ENROLLMENT_ACTIVE,
            Self::Completed => ENROLLMENT_COMPLETED,
        }
    }
}

// ---------------------------------------------------------------------------
// Pass policy
// ---------------------------------------------------------------------------

/// Outcome of applying a lesson's score gate to a submitted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassDecision {
    /// The attempt counts as a completion.
    Passed,
    /// The lesson has a score gate and the attempt did not clear it.
    /// A missing score never clears a gate.
    Failed { minimum_score: i32 },
}

impl PassDecision {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Apply the pass policy.
///
/// Lessons without `required_score` are completion-only: any attempt
/// passes, with or without a score.
pub fn check_pass(required_score: Option<i32>, score: Option<i32>) -> PassDecision {
    match required_score {
        None => PassDecision::Passed,
        Some(minimum_score) => match score {
            Some(s) if s >= minimum_score => PassDecision::Passed,
            _ => PassDecision::Failed { minimum_score },
        },
    }
}

// ---------------------------------------------------------------------------
// Progress arithmetic
// ---------------------------------------------------------------------------

/// Lessons completed after a first pass, never exceeding the snapshot total.
pub fn increment_completed(lessons_completed: i32, total_lessons: i32) -> i32 {
    (lessons_completed + 1).min(total_lessons)
}

/// A course is complete when every lesson in the enrollment snapshot is done.
///
/// An empty snapshot never counts as complete; publishing requires at least
/// one lesson so this only guards against bad data.
pub fn is_course_complete(lessons_completed: i32, total_lessons: i32) -> bool {
    total_lessons > 0 && lessons_completed >= total_lessons
}

/// Whole-number completion percentage, clamped to 0..=100.
pub fn progress_pct(lessons_completed: i32, total_lessons: i32) -> u8 {
    if total_lessons <= 0 {
        return 0;
    }
    let pct = (f64::from(lessons_completed) / f64::from(total_lessons) * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Validate a reported time-spent value in seconds.
pub fn validate_time_spent(secs: i32) -> Result<(), String> {
    if (0..=MAX_TIME_SPENT_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(format!(
            "timeSpent must be between 0 and {MAX_TIME_SPENT_SECS} seconds"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_db_strings() {
        assert_eq!(
            EnrollmentStatus::from_str_value("completed").unwrap(),
            EnrollmentStatus::Completed
        );
        assert_eq!(EnrollmentStatus::Active.as_str(), "active");
        assert!(EnrollmentStatus::from_str_value("dropped").is_err());
    }

    #[test]
    fn ungated_lesson_always_passes() {
        assert_eq!(check_pass(None, None), PassDecision::Passed);
        assert_eq!(check_pass(None, Some(0)), PassDecision::Passed);
    }

    #[test]
    fn gated_lesson_requires_score_at_or_above_threshold() {
        assert_eq!(check_pass(Some(80), Some(80)), PassDecision::Passed);
        assert_eq!(
            check_pass(Some(80), Some(79)),
            PassDecision::Failed { minimum_score: 80 }
        );
    }

    #[test]
    fn gated_lesson_without_score_fails() {
        let decision = check_pass(Some(85), None);
        assert!(!decision.is_passed());
        assert_eq!(decision, PassDecision::Failed { minimum_score: 85 });
    }

    #[test]
    fn increment_never_exceeds_total() {
        assert_eq!(increment_completed(0, 7), 1);
        assert_eq!(increment_completed(6, 7), 7);
        assert_eq!(increment_completed(7, 7), 7);
    }

    #[test]
    fn completion_requires_all_lessons() {
        assert!(!is_course_complete(6, 7));
        assert!(is_course_complete(7, 7));
        assert!(!is_course_complete(0, 0));
    }

    #[test]
    fn progress_pct_rounds_and_clamps() {
        assert_eq!(progress_pct(1, 3), 33);
        assert_eq!(progress_pct(2, 3), 67);
        assert_eq!(progress_pct(7, 7), 100);
        assert_eq!(progress_pct(3, 0), 0);
    }

    #[test]
    fn time_spent_bounds() {
        assert!(validate_time_spent(0).is_ok());
        assert!(validate_time_spent(MAX_TIME_SPENT_SECS).is_ok());
        assert!(validate_time_spent(-1).is_err());
        assert!(validate_time_spent(MAX_TIME_SPENT_SECS + 1).is_err());
    }
}
