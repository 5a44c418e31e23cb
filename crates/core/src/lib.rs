//! Pure domain logic for the learnloop platform.
//!
//! Nothing in this crate touches the database. Callers load the facts a
//! decision needs and pass them in; the functions here decide.

pub mod catalog;
pub mod certificate;
pub mod course;
pub mod eligibility;
pub mod error;
pub mod gamification;
pub mod goals;
pub mod progression;
pub mod roles;
pub mod types;
