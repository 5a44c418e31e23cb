pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod gamification;
pub mod goals;
pub mod oversight;
pub mod users;
