//! HTTP-level tests for certificate issuance and verification.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{body_json, get, get_auth, lesson, post_auth, post_json_auth, seed_course, CourseSpec};
use learnloop_db::models::course::Course;
use learnloop_db::models::lesson::Lesson;
use sqlx::PgPool;

/// Enroll and pass every lesson of `course`.
async fn finish_course(pool: &PgPool, course: &Course, lessons: &[Lesson], token: &str) {
    let uri = format!("/api/courses/{}/enroll", course.id);
    post_auth(common::build_test_app(pool.clone()), &uri, token).await;
    for l in lessons {
        let uri = format!("/api/courses/{}/lessons/{}/complete", course.id, l.id);
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &uri,
            serde_json::json!({ "timeSpent": 60 }),
            token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn issue_requires_completed_enrollment(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let (course, _) = seed_course(
        &pool,
        CourseSpec {
            slug: "long",
            lessons: &[lesson(10), lesson(10)],
            ..Default::default()
        },
    )
    .await;
    let uri = format!("/api/courses/{}/certificate", course.id);

    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let enroll = format!("/api/courses/{}/enroll", course.id);
    post_auth(common::build_test_app(pool.clone()), &enroll, &token).await;

    let response = post_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn issue_is_idempotent_and_sets_certificate_earned(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "kid", "student").await;
    let (course, lessons) = seed_course(
        &pool,
        CourseSpec {
            slug: "short",
            lessons: &[lesson(10)],
            ..Default::default()
        },
    )
    .await;
    finish_course(&pool, &course, &lessons, &token).await;
    let uri = format!("/api/courses/{}/certificate", course.id);

    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let issued = body_json(response).await["data"].clone();
    let year = Utc::now().year();
    assert_eq!(issued["certificateNumber"], format!("CERT-{year}-000001"));
    assert_eq!(issued["verificationCode"].as_str().unwrap().len(), 12);
    assert_eq!(issued["courseTitle"], "Course short");
    assert_eq!(issued["studentName"], "kid");
    assert_eq!(issued["userId"], user.id);

    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let again = body_json(response).await["data"].clone();
    assert_eq!(again["id"], issued["id"]);
    assert_eq!(again["verificationCode"], issued["verificationCode"]);

    let earned: bool = sqlx::query_scalar(
        "SELECT certificate_earned FROM enrollments WHERE user_id = $1 AND course_id = $2",
    )
    .bind(user.id)
    .bind(course.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(earned);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn numbers_increase_across_users(pool: PgPool) {
    let (course, lessons) = seed_course(
        &pool,
        CourseSpec {
            slug: "shared",
            lessons: &[lesson(10)],
            ..Default::default()
        },
    )
    .await;
    let year = Utc::now().year();

    for (i, name) in ["first", "second"].into_iter().enumerate() {
        let (_, token) = common::create_user(&pool, name, "student").await;
        finish_course(&pool, &course, &lessons, &token).await;
        let uri = format!("/api/courses/{}/certificate", course.id);
        let json = body_json(post_auth(common::build_test_app(pool.clone()), &uri, &token).await)
            .await;
        assert_eq!(
            json["data"]["certificateNumber"],
            format!("CERT-{year}-{:06}", i + 1)
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verify_is_public_and_case_insensitive(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let (course, lessons) = seed_course(
        &pool,
        CourseSpec {
            slug: "verify",
            lessons: &[lesson(10)],
            ..Default::default()
        },
    )
    .await;
    finish_course(&pool, &course, &lessons, &token).await;
    let uri = format!("/api/courses/{}/certificate", course.id);
    let issued = body_json(post_auth(common::build_test_app(pool.clone()), &uri, &token).await)
        .await["data"]
        .clone();
    let code = issued["verificationCode"].as_str().unwrap().to_ascii_lowercase();

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/certificates/verify/{code}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], issued["id"]);

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/certificates/verify/ZZZZZZZZZZZZ",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mine = body_json(
        get_auth(common::build_test_app(pool), "/api/certificates/user", &token).await,
    )
    .await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn certificate_survives_unenroll(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "kid", "student").await;
    let (course, lessons) = seed_course(
        &pool,
        CourseSpec {
            slug: "keep",
            lessons: &[lesson(10)],
            ..Default::default()
        },
    )
    .await;
    finish_course(&pool, &course, &lessons, &token).await;
    let uri = format!("/api/courses/{}/certificate", course.id);
    post_auth(common::build_test_app(pool.clone()), &uri, &token).await;

    let enroll = format!("/api/courses/{}/enroll", course.id);
    let response = common::delete_auth(common::build_test_app(pool.clone()), &enroll, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let enrollment_id: Option<i64> =
        sqlx::query_scalar("SELECT enrollment_id FROM certificates WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(enrollment_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_issue_returns_one_certificate(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "kid", "student").await;
    let (course, lessons) = seed_course(
        &pool,
        CourseSpec {
            slug: "race",
            lessons: &[lesson(10)],
            ..Default::default()
        },
    )
    .await;
    finish_course(&pool, &course, &lessons, &token).await;
    let uri = format!("/api/courses/{}/certificate", course.id);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let uri = uri.clone();
            let token = token.clone();
            tokio::spawn(async move {
                let response = post_auth(common::build_test_app(pool), &uri, &token).await;
                let status = response.status();
                (status, body_json(response).await)
            })
        })
        .collect();

    let mut created = 0;
    let mut ids = Vec::new();
    for task in tasks {
        let (status, json) = task.await.unwrap();
        match status {
            StatusCode::CREATED => created += 1,
            StatusCode::OK => {}
            other => panic!("unexpected status {other}: {json}"),
        }
        ids.push(json["data"]["id"].as_i64().unwrap());
    }
    assert_eq!(created, 1);
    assert!(ids.windows(2).all(|w| w[0] == w[1]));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM certificates WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let last_value: i32 = sqlx::query_scalar("SELECT last_value FROM certificate_sequences")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(last_value, 1);
}
