pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod gamification;
pub mod goals;
pub mod health;
pub mod oversight;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /users/me                                        current user
/// /users/dashboard                                 dashboard
/// /users/stats                                     ledger figures
/// /users/achievements                              achievement catalog
///
/// /gamification/levels                             level table (public)
///
/// /courses                                         catalog (public, optional auth)
/// /courses/slug/{slug}                             course by slug
/// /courses/{id}                                    course by id
/// /courses/{id}/eligibility                        eligibility check
/// /courses/{id}/enroll                             enroll (POST), unenroll (DELETE)
/// /courses/{id}/lessons/{lesson_id}/complete       lesson attempt (POST)
/// /courses/{id}/certificate                        issue certificate (POST)
///
/// /certificates/user                               caller's certificates
/// /certificates/verify/{code}                      verify (public)
///
/// /goals                                           list, create
/// /goals/{id}                                      get, update, delete
/// /goals/{id}/progress                             increment (POST)
/// /goals/{id}/status                               pause/resume/archive (POST)
///
/// /oversight/students                              linked students (guardian)
/// /oversight/students/{id}/dashboard               student dashboard (guardian)
///
/// /admin/courses                                   create draft (admin only)
/// /admin/courses/{id}/lessons                      append lesson
/// /admin/courses/{id}/publish                      publish
/// /admin/student-links                             link guardian to student
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/gamification", gamification::router())
        .nest("/courses", courses::router())
        .nest("/certificates", certificates::router())
        .nest("/goals", goals::router())
        .nest("/oversight", oversight::router())
        .nest("/admin", admin::router())
}
