//! HTTP-level tests for personal goals.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_goal(pool: &PgPool, token: &str, body: Value) -> Value {
    let response = post_json_auth(common::build_test_app(pool.clone()), "/api/goals", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn reading_goal(target: i32) -> Value {
    json!({
        "title": "Read every day",
        "goalType": "daily",
        "targetValue": target,
        "unit": "lessons"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_list_update_delete(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "kid", "student").await;

    let goal = create_goal(&pool, &token, reading_goal(3)).await;
    assert_eq!(goal["userId"], user.id);
    assert_eq!(goal["status"], "active");
    assert_eq!(goal["currentValue"], 0);
    let id = goal["id"].as_i64().unwrap();

    let list = body_json(get_auth(common::build_test_app(pool.clone()), "/api/goals", &token).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/goals/{id}"),
        json!({ "title": "Read more", "targetValue": 5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Read more");
    assert_eq!(updated["targetValue"], 5);
    assert_eq!(updated["unit"], "lessons");

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/goals/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], true);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/goals/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_unknown_type_and_zero_target(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;

    let mut body = reading_goal(3);
    body["goalType"] = json!("yearly");
    let response = post_json_auth(common::build_test_app(pool.clone()), "/api/goals", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/goals",
        reading_goal(0),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_reaches_target_and_completes(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let goal = create_goal(&pool, &token, reading_goal(3)).await;
    let uri = format!("/api/goals/{}/progress", goal["id"]);

    let first = body_json(
        post_json_auth(common::build_test_app(pool.clone()), &uri, json!({ "amount": 2 }), &token).await,
    )
    .await;
    assert_eq!(first["data"]["currentValue"], 2);
    assert_eq!(first["data"]["status"], "active");

    let second = body_json(
        post_json_auth(common::build_test_app(pool.clone()), &uri, json!({ "amount": 2 }), &token).await,
    )
    .await;
    assert_eq!(second["data"]["currentValue"], 4);
    assert_eq!(second["data"]["status"], "completed");
    assert_eq!(second["data"]["streakCount"], 1);
    assert!(second["data"]["completedAt"].is_string());

    let response = post_json_auth(common::build_test_app(pool.clone()), &uri, json!({ "amount": 1 }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let completed = body_json(
        get_auth(common::build_test_app(pool), "/api/goals?status=completed", &token).await,
    )
    .await;
    assert_eq!(completed["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_after_due_date_expires_goal(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let mut body = reading_goal(3);
    body["dueDate"] = json!((Utc::now().date_naive() - Duration::days(2)).to_string());
    let goal = create_goal(&pool, &token, body).await;
    let id = goal["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/goals/{id}/progress"),
        json!({ "amount": 1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stored = body_json(
        get_auth(common::build_test_app(pool), &format!("/api/goals/{id}"), &token).await,
    )
    .await;
    assert_eq!(stored["data"]["status"], "expired");
    assert_eq!(stored["data"]["currentValue"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_transitions(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let goal = create_goal(&pool, &token, reading_goal(3)).await;
    let uri = format!("/api/goals/{}/status", goal["id"]);

    let change = |action: &'static str| {
        let pool = pool.clone();
        let uri = uri.clone();
        let token = token.clone();
        async move {
            post_json_auth(
                common::build_test_app(pool),
                &uri,
                json!({ "action": action }),
                &token,
            )
            .await
        }
    };

    let response = change("resume").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let paused = body_json(change("pause").await).await;
    assert_eq!(paused["data"]["status"], "paused");

    let progress = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/goals/{}/progress", goal["id"]),
        json!({ "amount": 1 }),
        &token,
    )
    .await;
    assert_eq!(progress.status(), StatusCode::CONFLICT);

    let resumed = body_json(change("resume").await).await;
    assert_eq!(resumed["data"]["status"], "active");

    let archived = body_json(change("archive").await).await;
    assert_eq!(archived["data"]["status"], "archived");

    assert_eq!(change("archive").await.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn goals_are_private_to_their_owner(pool: PgPool) {
    let (_, owner) = common::create_user(&pool, "owner", "student").await;
    let (_, other) = common::create_user(&pool, "other", "student").await;
    let goal = create_goal(&pool, &owner, reading_goal(3)).await;
    let uri = format!("/api/goals/{}", goal["id"]);

    let response = get_auth(common::build_test_app(pool.clone()), &uri, &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = body_json(get_auth(common::build_test_app(pool), "/api/goals", &other).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_rejects_unknown_status(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let response = get_auth(common::build_test_app(pool), "/api/goals?status=bogus", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_progress_increments_all_count(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "kid", "student").await;
    let goal = create_goal(&pool, &token, reading_goal(100)).await;
    let id = goal["id"].as_i64().unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let pool = pool.clone();
            let token = token.clone();
            tokio::spawn(async move {
                post_json_auth(
                    common::build_test_app(pool),
                    &format!("/api/goals/{id}/progress"),
                    json!({ "amount": 1 }),
                    &token,
                )
                .await
                .status()
            })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let stored = body_json(
        get_auth(common::build_test_app(pool), &format!("/api/goals/{id}"), &token).await,
    )
    .await;
    assert_eq!(stored["data"]["currentValue"], 20);
    assert_eq!(stored["data"]["status"], "active");
}
