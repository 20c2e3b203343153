use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

use aral_migration::{Migrator, MigratorTrait};
use aral_server::api::{
    AppState, create_assessments_router, create_attempts_router, create_lessons_router,
    create_performance_tasks_router, create_student_router,
};

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
}

/// Fresh in-memory database with the full schema applied, behind the same
/// router stack the binary serves. One connection so every request sees the
/// same sqlite instance.
pub async fn setup() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("in-memory sqlite should connect");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");

    let state = Arc::new(AppState::new(db.clone()));
    let router = create_lessons_router()
        .merge(create_assessments_router())
        .merge(create_attempts_router())
        .merge(create_performance_tasks_router())
        .merge(create_student_router())
        .with_state(state);

    TestApp { db, router }
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();

    (status, read_json(response).await)
}

/// Creates a lesson and returns its id. Assessments carry a foreign key to
/// their lesson, so most fixtures start here.
pub async fn create_lesson(router: &Router, course_id: i32, order_no: i32) -> i32 {
    let (status, body) = send(
        router,
        json_request(
            Method::POST,
            "/api/lessons",
            Some(json!({
                "course_id": course_id,
                "title": format!("Lesson {order_no}"),
                "order_no": order_no,
                "is_active": true,
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body["lesson"]["id"].as_i64().expect("lesson id") as i32
}

pub async fn create_assessment(router: &Router, payload: Value) -> Value {
    let (status, body) = send(
        router,
        json_request(Method::POST, "/api/assessments", Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body
}

/// Quiz with one single-choice question worth 5 points. Option "Paris" is
/// correct, "London" is not.
pub fn capital_quiz_payload(course_id: i32, lesson_id: i32) -> Value {
    json!({
        "title": "Geography Quiz",
        "assessment_type": "quiz",
        "course_id": course_id,
        "lesson_id": lesson_id,
        "questions": [
            {
                "question": "What is the capital of France?",
                "type": "single_choice",
                "points": 5,
                "options": [
                    { "description": "Paris", "is_correct": true },
                    { "description": "London", "is_correct": false },
                ],
            },
        ],
    })
}

/// Looks up the stored option ids of the capital quiz by description.
pub async fn quiz_option_ids(router: &Router, assessment_id: i64) -> (i64, i64) {
    let (status, detail) = send(
        router,
        json_request(Method::GET, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {detail}");

    let options = detail["questions"][0]["options"]
        .as_array()
        .expect("question options");
    let find = |description: &str| {
        options
            .iter()
            .find(|option| option["description"] == description)
            .and_then(|option| option["id"].as_i64())
            .expect("option id")
    };

    (find("Paris"), find("London"))
}

pub async fn submit_attempt(router: &Router, payload: Value) -> (StatusCode, Value) {
    send(
        router,
        json_request(Method::POST, "/api/student/submit-attempt", Some(payload)),
    )
    .await
}
