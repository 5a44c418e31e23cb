#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use learnloop_api::auth::jwt::{generate_access_token, JwtConfig};
use learnloop_api::auth::password::hash_password;
use learnloop_api::config::ServerConfig;
use learnloop_api::router::build_app_router;
use learnloop_api::state::AppState;
use learnloop_core::eligibility::NoSubscriptions;
use learnloop_core::gamification::LevelTable;
use learnloop_core::types::DbId;
use learnloop_db::models::course::{Course, CreateCourse};
use learnloop_db::models::lesson::{CreateLesson, Lesson};
use learnloop_db::models::user::{CreateUser, User};
use learnloop_db::repositories::{CourseRepo, LessonRepo, UserRepo};

/// Plaintext password of every seeded user.
pub const TEST_PASSWORD: &str = "correct-horse-42";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: String::new(),
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        entitlements: Arc::new(NoSubscriptions),
        levels: Arc::new(LevelTable::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST without a body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).unwrap())
        .clone()
}

/// Insert a user with `role` and return it with a valid access token.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: password_hash(),
            display_name: None,
            role: role.to_string(),
            grade_level: None,
        },
    )
    .await
    .unwrap();
    let token = generate_access_token(user.id, &user.role, &test_config().jwt).unwrap();
    (user, token)
}

/// Lesson shape for [`seed_course`]: XP reward and optional pass threshold.
#[derive(Debug, Clone, Copy)]
pub struct LessonSpec {
    pub xp: i32,
    pub required_score: Option<i32>,
}

pub const fn lesson(xp: i32) -> LessonSpec {
    LessonSpec {
        xp,
        required_score: None,
    }
}

pub const fn scored_lesson(xp: i32, required_score: i32) -> LessonSpec {
    LessonSpec {
        xp,
        required_score: Some(required_score),
    }
}

/// Options for [`seed_course`].
#[derive(Debug, Clone, Default)]
pub struct CourseSpec<'a> {
    pub slug: &'a str,
    pub is_premium: bool,
    pub prerequisites: &'a [DbId],
    pub lessons: &'a [LessonSpec],
    pub draft: bool,
}

/// Insert a course with lessons, published unless `seed.draft`.
pub async fn seed_course(pool: &PgPool, seed: CourseSpec<'_>) -> (Course, Vec<Lesson>) {
    let course = CourseRepo::create(
        pool,
        &CreateCourse {
            title: format!("Course {}", seed.slug),
            slug: seed.slug.to_string(),
            description: format!("All about {}", seed.slug),
            subject: "math".to_string(),
            difficulty: "beginner".to_string(),
            is_premium: seed.is_premium,
            created_by: None,
        },
        seed.prerequisites,
    )
    .await
    .unwrap();

    let mut lessons = Vec::with_capacity(seed.lessons.len());
    for (i, l) in seed.lessons.iter().enumerate() {
        let lesson = LessonRepo::create(
            pool,
            &CreateLesson {
                course_id: course.id,
                title: format!("Lesson {}", i + 1),
                description: String::new(),
                lesson_type: "reading".to_string(),
                lesson_order: i as i32 + 1,
                xp_reward: l.xp,
                required_score: l.required_score,
                duration_minutes: Some(10),
                content_url: None,
            },
        )
        .await
        .unwrap();
        lessons.push(lesson);
    }

    let course = if seed.draft {
        CourseRepo::find_by_id(pool, course.id).await.unwrap().unwrap()
    } else {
        CourseRepo::publish(pool, course.id).await.unwrap().unwrap()
    };
    (course, lessons)
}
