//! Enrollment & progress engine.
//!
//! Orchestrates the pure decisions in `learnloop_core` over the repositories
//! in `learnloop_db`. Anything that must be atomic runs inside one
//! transaction here; handlers stay thin and only translate HTTP.
//!
//! - [`eligibility`] -- may a user enroll in a course, and why not.
//! - [`enrollment`] -- enroll / unenroll.
//! - [`completion`] -- lesson attempts, first-pass credit, course completion.
//! - [`ledger`] -- lifetime XP, levels, streaks, achievements.
//! - [`certificates`] -- certificate issuance for completed enrollments.
//! - [`dashboard`] -- read models for students and their guardians.

pub mod certificates;
pub mod completion;
pub mod dashboard;
pub mod eligibility;
pub mod enrollment;
pub mod ledger;
