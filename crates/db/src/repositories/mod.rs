//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that take part in a
//! multi-statement transaction accept `&mut PgConnection` instead so the
//! engine can run them on `&mut *tx`.

pub mod achievement_repo;
pub mod certificate_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod goal_repo;
pub mod lesson_progress_repo;
pub mod lesson_repo;
pub mod student_link_repo;
pub mod user_repo;
pub mod user_stats_repo;

pub use achievement_repo::AchievementRepo;
pub use certificate_repo::CertificateRepo;
pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use goal_repo::GoalRepo;
pub use lesson_progress_repo::LessonProgressRepo;
pub use lesson_repo::LessonRepo;
pub use student_link_repo::StudentLinkRepo;
pub use user_repo::UserRepo;
pub use user_stats_repo::UserStatsRepo;
