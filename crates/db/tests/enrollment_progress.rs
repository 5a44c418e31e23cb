//! Integration tests for the enrollment, progress, ledger and certificate
//! repositories.
//!
//! Exercises the statements the completion engine relies on:
//! - First-pass detection on the progress upsert
//! - Exactly-once course completion
//! - Cascade delete on unenroll
//! - Per-year certificate sequences
//! - Idempotent achievement grants

use assert_matches::assert_matches;
use learnloop_core::catalog::{CourseFilter, PageWindow, SortDirection, SortField};
use learnloop_db::models::course::CreateCourse;
use learnloop_db::models::lesson::CreateLesson;
use learnloop_db::models::user::CreateUser;
use learnloop_db::repositories::{
    AchievementRepo, CertificateRepo, CourseRepo, EnrollmentRepo, LessonProgressRepo, LessonRepo,
    UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            display_name: None,
            role: "student".to_string(),
            grade_level: Some(4),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_course(title: &str, is_premium: bool) -> CreateCourse {
    CreateCourse {
        title: title.to_string(),
        slug: learnloop_core::course::slugify(title),
        description: format!("All about {title}"),
        subject: "math".to_string(),
        difficulty: "beginner".to_string(),
        is_premium,
        created_by: None,
    }
}

/// Create and publish a course with `lessons` lessons worth 10 XP each.
async fn seed_course(pool: &PgPool, title: &str, lessons: i32) -> (i64, Vec<i64>) {
    let course = CourseRepo::create(pool, &new_course(title, false), &[])
        .await
        .unwrap();
    let mut ids = Vec::new();
    for order in 1..=lessons {
        let lesson = LessonRepo::create(
            pool,
            &CreateLesson {
                course_id: course.id,
                title: format!("Lesson {order}"),
                description: String::new(),
                lesson_type: "video".to_string(),
                lesson_order: order,
                xp_reward: 10,
                required_score: None,
                duration_minutes: Some(5),
                content_url: None,
            },
        )
        .await
        .unwrap();
        ids.push(lesson.id);
    }
    CourseRepo::publish(pool, course.id).await.unwrap().unwrap();
    (course.id, ids)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lesson_xp_rolls_up_into_course_total(pool: PgPool) {
    let (course_id, _) = seed_course(&pool, "Fractions", 3).await;
    let course = CourseRepo::find_published(&pool, course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(course.total_xp, 30);
    assert!(course.published_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_enrollment_hits_unique_constraint(pool: PgPool) {
    let user_id = seed_user(&pool, "ada").await;
    let (course_id, _) = seed_course(&pool, "Geometry", 1).await;

    EnrollmentRepo::create(&pool, user_id, course_id, 1).await.unwrap();
    let err = EnrollmentRepo::create(&pool, user_id, course_id, 1)
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_enrollments_user_course"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_pass_reports_first_pass_once(pool: PgPool) {
    let user_id = seed_user(&pool, "grace").await;
    let (course_id, lessons) = seed_course(&pool, "Decimals", 2).await;
    let enrollment = EnrollmentRepo::create(&pool, user_id, course_id, 2).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let first = LessonProgressRepo::upsert_pass(&mut conn, enrollment.id, lessons[0], Some(70), 30)
        .await
        .unwrap();
    let second = LessonProgressRepo::upsert_pass(&mut conn, enrollment.id, lessons[0], Some(95), 20)
        .await
        .unwrap();

    assert!(first.first_pass);
    assert!(!second.first_pass);
    assert_eq!(second.progress.attempts, 2);
    assert_eq!(second.progress.score, Some(95));
    assert_eq!(second.progress.completed_at, first.progress.completed_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_average_score_ignores_unscored_lessons(pool: PgPool) {
    let user_id = seed_user(&pool, "alan").await;
    let (course_id, lessons) = seed_course(&pool, "Ratios", 3).await;
    let enrollment = EnrollmentRepo::create(&pool, user_id, course_id, 3).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    LessonProgressRepo::upsert_pass(&mut conn, enrollment.id, lessons[0], Some(80), 10)
        .await
        .unwrap();
    LessonProgressRepo::upsert_pass(&mut conn, enrollment.id, lessons[1], None, 10)
        .await
        .unwrap();
    LessonProgressRepo::upsert_pass(&mut conn, enrollment.id, lessons[2], Some(90), 10)
        .await
        .unwrap();

    let refreshed = EnrollmentRepo::refresh_average_score(&mut conn, enrollment.id)
        .await
        .unwrap();
    assert_eq!(refreshed.average_score, Some(85.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_completed_happens_once(pool: PgPool) {
    let user_id = seed_user(&pool, "linus").await;
    let (course_id, _) = seed_course(&pool, "Angles", 1).await;
    let enrollment = EnrollmentRepo::create(&pool, user_id, course_id, 1).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert!(EnrollmentRepo::mark_completed(&mut conn, enrollment.id)
        .await
        .unwrap()
        .is_none());

    EnrollmentRepo::record_first_pass(&mut conn, enrollment.id, 1, 10)
        .await
        .unwrap();
    let completed = EnrollmentRepo::mark_completed(&mut conn, enrollment.id)
        .await
        .unwrap()
        .expect("first transition succeeds");
    assert_eq!(completed.status, "completed");
    assert!(completed.completed_at.is_some());

    assert!(EnrollmentRepo::mark_completed(&mut conn, enrollment.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lessons_completed_cannot_exceed_total(pool: PgPool) {
    let user_id = seed_user(&pool, "barbara").await;
    let (course_id, _) = seed_course(&pool, "Shapes", 1).await;
    let enrollment = EnrollmentRepo::create(&pool, user_id, course_id, 1).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let err = EnrollmentRepo::record_first_pass(&mut conn, enrollment.id, 2, 10)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_enrollments_lessons_bounds"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unenroll_cascades_progress(pool: PgPool) {
    let user_id = seed_user(&pool, "edsger").await;
    let (course_id, lessons) = seed_course(&pool, "Graphs", 1).await;
    let enrollment = EnrollmentRepo::create(&pool, user_id, course_id, 1).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    LessonProgressRepo::upsert_pass(&mut conn, enrollment.id, lessons[0], None, 5)
        .await
        .unwrap();
    drop(conn);

    assert!(EnrollmentRepo::delete_for_user_course(&pool, user_id, course_id)
        .await
        .unwrap());
    assert!(LessonProgressRepo::list_for_enrollment(&pool, enrollment.id)
        .await
        .unwrap()
        .is_empty());
    assert!(!EnrollmentRepo::delete_for_user_course(&pool, user_id, course_id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_certificate_sequence_is_per_year(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    assert_eq!(CertificateRepo::next_sequence(&mut conn, 2025).await.unwrap(), 1);
    assert_eq!(CertificateRepo::next_sequence(&mut conn, 2025).await.unwrap(), 2);
    assert_eq!(CertificateRepo::next_sequence(&mut conn, 2026).await.unwrap(), 1);
    assert_eq!(CertificateRepo::next_sequence(&mut conn, 2025).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_achievement_grant_is_idempotent(pool: PgPool) {
    let user_id = seed_user(&pool, "margaret").await;
    let mut conn = pool.acquire().await.unwrap();

    let first = AchievementRepo::grant(&mut conn, user_id, "first-lesson")
        .await
        .unwrap();
    let second = AchievementRepo::grant(&mut conn, user_id, "first-lesson")
        .await
        .unwrap();

    assert_matches!(first, Some(ref a) if a.achievement_code == "first-lesson");
    assert_matches!(second, None);
    assert_eq!(
        AchievementRepo::codes_for_user(&mut conn, user_id).await.unwrap(),
        vec!["first-lesson".to_string()]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_hides_drafts_and_filters_search(pool: PgPool) {
    seed_course(&pool, "Space Explorers", 2).await;
    seed_course(&pool, "Ocean Life", 1).await;
    CourseRepo::create(&pool, &new_course("Secret Draft", false), &[])
        .await
        .unwrap();

    let all = CourseFilter::new(None, None, None, None).unwrap();
    assert_eq!(CourseRepo::count_catalog(&pool, &all).await.unwrap(), 2);

    let search = CourseFilter::new(None, None, None, Some("SPACE")).unwrap();
    let items = CourseRepo::list_catalog(
        &pool,
        &search,
        SortField::Title,
        SortDirection::Asc,
        PageWindow::new(None, None),
    )
    .await
    .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].course.title, "Space Explorers");
    assert_eq!(items[0].lesson_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_prerequisite_progress_tracks_completion(pool: PgPool) {
    let user_id = seed_user(&pool, "katherine").await;
    let (basics_id, _) = seed_course(&pool, "Counting", 1).await;
    let advanced = CourseRepo::create(&pool, &new_course("Algebra", false), &[basics_id])
        .await
        .unwrap();

    let before = CourseRepo::prerequisite_progress(&pool, advanced.id, user_id)
        .await
        .unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].title, "Counting");
    assert!(!before[0].completed);

    let enrollment = EnrollmentRepo::create(&pool, user_id, basics_id, 1).await.unwrap();
    let mut conn = pool.acquire().await.unwrap();
    EnrollmentRepo::record_first_pass(&mut conn, enrollment.id, 1, 10)
        .await
        .unwrap();
    EnrollmentRepo::mark_completed(&mut conn, enrollment.id)
        .await
        .unwrap();
    drop(conn);

    let after = CourseRepo::prerequisite_progress(&pool, advanced.id, user_id)
        .await
        .unwrap();
    assert!(after[0].completed);
}
