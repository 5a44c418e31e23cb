//! Enrollment eligibility decision.
//!
//! The decision is a pure function over facts the caller has already
//! loaded (prerequisite completion, existing enrollments, entitlement).
//! Course existence and publication are checked by the caller before any
//! facts are gathered, so an unknown course never reaches this module.

use serde::Serialize;

use crate::types::DbId;

/// Maximum number of free (non-premium) courses a user without premium
/// access may hold at once, counting ACTIVE and COMPLETED enrollments.
pub const FREE_COURSE_LIMIT: i64 = 2;

// ---------------------------------------------------------------------------
// Entitlements
// ---------------------------------------------------------------------------

/// Source of truth for premium access.
///
/// There is no subscription system yet, so the only shipped implementation
/// is [`NoSubscriptions`]. Swap in a real implementation through `AppState`
/// once entitlements exist.
pub trait EntitlementCheck: Send + Sync {
    fn has_premium_access(&self, user_id: DbId) -> bool;
}

/// Entitlement source that grants premium access to nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSubscriptions;

impl EntitlementCheck for NoSubscriptions {
    fn has_premium_access(&self, _user_id: DbId) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A prerequisite course and whether the user has completed it.
#[derive(Debug, Clone)]
pub struct PrerequisiteStatus {
    pub course_id: DbId,
    pub title: String,
    pub completed: bool,
}

/// Everything the decision needs, pre-loaded by the caller.
#[derive(Debug, Clone)]
pub struct EligibilityFacts {
    pub course_is_premium: bool,
    pub already_enrolled: bool,
    pub prerequisites: Vec<PrerequisiteStatus>,
    pub has_premium_access: bool,
    /// Enrollments the user holds in non-premium courses.
    pub free_courses_enrolled: i64,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Why enrollment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IneligibleReason {
    #[serde(rename = "prerequisites not met")]
    PrerequisitesNotMet,
    #[serde(rename = "premium required")]
    PremiumRequired,
    #[serde(rename = "free limit reached")]
    FreeLimitReached,
}

impl IneligibleReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PrerequisitesNotMet => "PREREQUISITES_NOT_MET",
            Self::PremiumRequired => "PREMIUM_REQUIRED",
            Self::FreeLimitReached => "FREE_LIMIT_REACHED",
        }
    }

    /// Human-readable message for the error envelope.
    pub fn message(&self) -> &'static str {
        match self {
            Self::PrerequisitesNotMet => "Complete the prerequisite courses first",
            Self::PremiumRequired => "This course requires a premium subscription",
            Self::FreeLimitReached => "Free course enrollment limit reached",
        }
    }
}

/// Structured eligibility result, serialized as-is into API details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub can_enroll: bool,
    pub already_enrolled: bool,
    pub reason: Option<IneligibleReason>,
    pub reason_code: Option<&'static str>,
    pub missing_prerequisites: Vec<String>,
    pub requires_premium: bool,
    pub has_premium_access: bool,
    pub free_courses_enrolled: i64,
    pub free_course_limit: i64,
}

impl EligibilityResult {
    fn base(facts: &EligibilityFacts) -> Self {
        Self {
            can_enroll: true,
            already_enrolled: false,
            reason: None,
            reason_code: None,
            missing_prerequisites: Vec::new(),
            requires_premium: facts.course_is_premium,
            has_premium_access: facts.has_premium_access,
            free_courses_enrolled: facts.free_courses_enrolled,
            free_course_limit: FREE_COURSE_LIMIT,
        }
    }

    fn refuse(mut self, reason: IneligibleReason) -> Self {
        self.can_enroll = false;
        self.reason = Some(reason);
        self.reason_code = Some(reason.code());
        self
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Decide whether the user may enroll.
///
/// Checks run in a fixed order and the first failing check wins:
/// already enrolled (idempotent success), prerequisites, premium gate,
/// free-course limit.
pub fn evaluate(facts: &EligibilityFacts) -> EligibilityResult {
    let result = EligibilityResult::base(facts);

    if facts.already_enrolled {
        return EligibilityResult {
            already_enrolled: true,
            ..result
        };
    }

    let missing: Vec<String> = facts
        .prerequisites
        .iter()
        .filter(|p| !p.completed)
        .map(|p| p.title.clone())
        .collect();
    if !missing.is_empty() {
        return EligibilityResult {
            missing_prerequisites: missing,
            ..result
        }
        .refuse(IneligibleReason::PrerequisitesNotMet);
    }

    if facts.course_is_premium {
        if !facts.has_premium_access {
            return result.refuse(IneligibleReason::PremiumRequired);
        }
        return result;
    }

    if !facts.has_premium_access && facts.free_courses_enrolled >= FREE_COURSE_LIMIT {
        return result.refuse(IneligibleReason::FreeLimitReached);
    }

    result
}
