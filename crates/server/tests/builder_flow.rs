mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use sea_orm::EntityTrait;
use serde_json::{Value, json};

use aral_server::entity::{performance_score, question};
use common::{capital_quiz_payload, create_assessment, create_lesson, json_request, send, setup};

#[tokio::test]
async fn test_create_assessment_fills_in_defaults() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;

    let created = create_assessment(
        &app.router,
        json!({
            "title": "Defaults Quiz",
            "assessment_type": "quiz",
            "course_id": 1,
            "lesson_id": lesson_id,
            "questions": [
                {
                    "question": "Worth five",
                    "type": "single_choice",
                    "points": 5,
                    "options": [{ "description": "Yes", "is_correct": true }],
                },
                {
                    "question": "No points given",
                    "type": "single_choice",
                    "options": [{ "description": "Yes", "is_correct": true }],
                },
            ],
        }),
    )
    .await;

    let assessment = &created["assessment"];
    assert_eq!(assessment["time_limit"], 30);
    assert_eq!(assessment["attempt_limit"], 1);
    // Unspecified question points count zero toward the total but are
    // stored as one.
    assert_eq!(assessment["total_points"], 5);

    let questions = created["questions"].as_array().expect("questions");
    assert_eq!(questions[0]["points"], 5);
    assert_eq!(questions[1]["points"], 1);
}

#[tokio::test]
async fn test_create_assessment_requires_identifying_fields() {
    let app = setup().await;

    let incomplete_payloads = [
        json!({ "assessment_type": "quiz", "course_id": 1, "lesson_id": 1 }),
        json!({ "title": "Quiz", "course_id": 1, "lesson_id": 1 }),
        json!({ "title": "Quiz", "assessment_type": "quiz", "lesson_id": 1 }),
        json!({ "title": "Quiz", "assessment_type": "quiz", "course_id": 0, "lesson_id": 1 }),
        json!({ "title": "", "assessment_type": "quiz", "course_id": 1, "lesson_id": 1 }),
    ];

    for payload in incomplete_payloads {
        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/api/assessments", Some(payload)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(
            body["message"],
            "Title, assessment type, course ID, and lesson ID are required"
        );
    }
}

#[tokio::test]
async fn test_create_assessment_requires_at_least_one_question() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/assessments",
            Some(json!({
                "title": "Empty Quiz",
                "assessment_type": "quiz",
                "course_id": 1,
                "lesson_id": lesson_id,
                "questions": [],
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "At least one question is required");
}

#[tokio::test]
async fn test_create_assessment_rejects_unknown_question_types() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/assessments",
            Some(json!({
                "title": "Bad Quiz",
                "assessment_type": "quiz",
                "course_id": 1,
                "lesson_id": lesson_id,
                "questions": [
                    { "question": "Match the columns", "type": "matching", "options": [] },
                ],
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "unknown question type: matching");
}

#[tokio::test]
async fn test_assessment_detail_includes_questions_with_correctness() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;
    let created = create_assessment(&app.router, capital_quiz_payload(1, lesson_id)).await;
    let assessment_id = created["assessment"]["id"].as_i64().expect("assessment id");

    let (status, body) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    // Assessment columns sit at the top level of the detail payload.
    assert_eq!(body["title"], "Geography Quiz");
    assert_eq!(body["total_points"], 5);

    let options = body["questions"][0]["options"].as_array().expect("options");
    assert_eq!(options.len(), 2);
    let paris = options
        .iter()
        .find(|option| option["description"] == "Paris")
        .expect("paris option");
    assert_eq!(paris["is_correct"], true);
}

#[tokio::test]
async fn test_update_assessment_diffs_the_question_set() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;
    let created = create_assessment(
        &app.router,
        json!({
            "title": "Before",
            "assessment_type": "quiz",
            "course_id": 1,
            "lesson_id": lesson_id,
            "questions": [
                {
                    "question": "Kept question",
                    "type": "single_choice",
                    "points": 2,
                    "options": [{ "description": "A", "is_correct": true }],
                },
                {
                    "question": "Dropped question",
                    "type": "single_choice",
                    "points": 2,
                    "options": [{ "description": "B", "is_correct": true }],
                },
            ],
        }),
    )
    .await;
    let assessment_id = created["assessment"]["id"].as_i64().expect("assessment id");
    let kept_id = created["questions"][0]["id"].as_i64().expect("question id");
    let dropped_id = created["questions"][1]["id"].as_i64().expect("question id");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/assessments/{assessment_id}"),
            Some(json!({
                "title": "After",
                "assessment_type": "exam",
                "course_id": 1,
                "lesson_id": lesson_id,
                "questions": [
                    {
                        "id": kept_id,
                        "question": "Kept question, reworded",
                        "type": "single_choice",
                        "points": 4,
                        "options": [
                            { "description": "A", "is_correct": false },
                            { "description": "C", "is_correct": true },
                        ],
                    },
                    {
                        "question": "Brand new question",
                        "type": "identification",
                        "points": 3,
                        "options": [{ "description": "Paris", "is_correct": true }],
                    },
                ],
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], "Assessment updated");
    assert_eq!(body["assessment"]["title"], "After");

    let (status, detail) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {detail}");

    let question_ids: HashSet<i64> = detail["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .map(|entry| entry["id"].as_i64().expect("question id"))
        .collect();

    assert_eq!(question_ids.len(), 2);
    assert!(question_ids.contains(&kept_id), "retained question keeps its id");
    assert!(!question_ids.contains(&dropped_id), "omitted question is deleted");

    let kept = detail["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .find(|entry| entry["id"].as_i64() == Some(kept_id))
        .expect("kept question");
    assert_eq!(kept["question"], "Kept question, reworded");
    assert_eq!(kept["points"], 4);
    // Options are rewritten wholesale on update.
    let descriptions: HashSet<&str> = kept["options"]
        .as_array()
        .expect("options")
        .iter()
        .map(|option| option["description"].as_str().expect("description"))
        .collect();
    assert_eq!(descriptions, HashSet::from(["A", "C"]));

    let stored_questions = question::Entity::find()
        .all(&app.db)
        .await
        .expect("questions should load");
    assert_eq!(stored_questions.len(), 2, "dropped question rows are removed");
}

#[tokio::test]
async fn test_update_missing_assessment_is_not_found() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            "/api/assessments/77",
            Some(json!({
                "title": "Ghost",
                "assessment_type": "quiz",
                "course_id": 1,
                "lesson_id": lesson_id,
                "questions": [
                    {
                        "question": "Q",
                        "type": "single_choice",
                        "options": [{ "description": "A", "is_correct": true }],
                    },
                ],
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["message"], "Assessment not found");
}

#[tokio::test]
async fn test_delete_assessment_removes_its_questions() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;
    let created = create_assessment(&app.router, capital_quiz_payload(1, lesson_id)).await;
    let assessment_id = created["assessment"]["id"].as_i64().expect("assessment id");

    let (status, body) = send(
        &app.router,
        json_request(Method::DELETE, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT, "response: {body}");

    let (status, _) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = question::Entity::find()
        .all(&app.db)
        .await
        .expect("questions should load");
    assert!(remaining.is_empty(), "questions should cascade with their assessment");

    let (status, body) = send(
        &app.router,
        json_request(Method::DELETE, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
}

#[tokio::test]
async fn test_assessments_listed_by_lesson_and_course() {
    let app = setup().await;
    let first_lesson = create_lesson(&app.router, 1, 1).await;
    let second_lesson = create_lesson(&app.router, 1, 2).await;
    create_assessment(&app.router, capital_quiz_payload(1, first_lesson)).await;
    create_assessment(&app.router, capital_quiz_payload(1, second_lesson)).await;

    let (status, by_lesson) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/assessments/lesson/{first_lesson}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {by_lesson}");
    assert_eq!(by_lesson.as_array().expect("assessments").len(), 1);

    let (status, by_course) = send(
        &app.router,
        json_request(Method::GET, "/api/assessments/course/1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {by_course}");
    assert_eq!(by_course.as_array().expect("assessments").len(), 2);
}

#[tokio::test]
async fn test_lesson_order_numbers_are_unique_per_course() {
    let app = setup().await;
    create_lesson(&app.router, 1, 1).await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/lessons",
            Some(json!({
                "course_id": 1,
                "title": "Duplicate order",
                "order_no": 1,
                "is_active": true,
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["message"], "Order number 1 is already used in this course.");

    // The same order number is free in another course.
    create_lesson(&app.router, 2, 1).await;
}

#[tokio::test]
async fn test_lesson_create_requires_an_order_number() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/lessons",
            Some(json!({ "course_id": 1, "title": "No order" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "Missing or invalid 'order_no' in request body.");
}

#[tokio::test]
async fn test_lesson_update_rewrites_attachments() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/lessons/{lesson_id}"),
            Some(json!({
                "title": "Renamed",
                "order_no": 1,
                "is_active": false,
                "attachment_links": ["https://example.com/a.pdf", "", "https://example.com/c.pdf"],
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], "Lesson updated successfully");
    assert_eq!(body["lesson"]["title"], "Renamed");
    assert_eq!(body["lesson"]["is_active"], false);

    let (status, detail) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/lessons/{lesson_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {detail}");

    let content = &detail["lesson"]["content"];
    assert_eq!(content["attachment_link_1"], "https://example.com/a.pdf");
    // Empty strings are stored as nulls, not kept verbatim.
    assert_eq!(content["attachment_link_2"], Value::Null);
    assert_eq!(content["attachment_link_3"], "https://example.com/c.pdf");
    assert_eq!(content["attachment_link_4"], Value::Null);
}

#[tokio::test]
async fn test_lesson_update_conflicts_on_taken_order() {
    let app = setup().await;
    create_lesson(&app.router, 1, 1).await;
    let second = create_lesson(&app.router, 1, 2).await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/lessons/{second}"),
            Some(json!({ "title": "Move up", "order_no": 1, "is_active": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");

    // Keeping its own order number is not a conflict.
    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/lessons/{second}"),
            Some(json!({ "title": "Same slot", "order_no": 2, "is_active": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
}

#[tokio::test]
async fn test_delete_lesson_cascades_to_assessments() {
    let app = setup().await;
    let lesson_id = create_lesson(&app.router, 1, 1).await;
    let created = create_assessment(&app.router, capital_quiz_payload(1, lesson_id)).await;
    let assessment_id = created["assessment"]["id"].as_i64().expect("assessment id");

    let (status, body) = send(
        &app.router,
        json_request(Method::DELETE, &format!("/api/lessons/{lesson_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], "Lesson and all related data deleted successfully");

    let (status, _) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/lessons/{lesson_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/assessments/{assessment_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_performance_task_lifecycle() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks",
            Some(json!({ "title": "Lab Report", "total_points": 20, "course_id": 5 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["title"], "Lab Report");
    assert_eq!(body["total_points"], 20);
    let task_id = body["id"].as_i64().expect("task id");

    let (status, listed) = send(
        &app.router,
        json_request(Method::GET, "/api/performance-tasks/course/5", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    assert_eq!(listed.as_array().expect("tasks").len(), 1);

    let (status, body) = send(
        &app.router,
        json_request(Method::DELETE, &format!("/api/performance-tasks/{task_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], "Performance task deleted successfully.");

    let (status, body) = send(
        &app.router,
        json_request(Method::DELETE, &format!("/api/performance-tasks/{task_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["message"], "Performance task not found.");
}

#[tokio::test]
async fn test_performance_task_requires_all_fields() {
    let app = setup().await;

    let incomplete_payloads = [
        json!({ "total_points": 20, "course_id": 5 }),
        json!({ "title": "Lab", "course_id": 5 }),
        json!({ "title": "Lab", "total_points": 0, "course_id": 5 }),
        json!({ "title": "Lab", "total_points": 20 }),
    ];

    for payload in incomplete_payloads {
        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/api/performance-tasks", Some(payload)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["message"], "All fields are required.");
    }
}

#[tokio::test]
async fn test_recording_a_score_replaces_the_previous_one() {
    let app = setup().await;

    let (_, task_body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks",
            Some(json!({ "title": "Lab Report", "total_points": 20, "course_id": 5 })),
        ),
    )
    .await;
    let task_id = task_body["id"].as_i64().expect("task id");

    for score in [10, 15] {
        let (status, body) = send(
            &app.router,
            json_request(
                Method::POST,
                "/api/performance-tasks/score",
                Some(json!({
                    "student_id": 4,
                    "performance_task_id": task_id,
                    "score": score,
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        assert_eq!(body["score"], score);
    }

    let rows = performance_score::Entity::find()
        .all(&app.db)
        .await
        .expect("scores should load");
    assert_eq!(rows.len(), 1, "re-recording should replace, not append");
    assert_eq!(rows[0].score, 15);
}

#[tokio::test]
async fn test_recorded_score_is_validated() {
    let app = setup().await;

    let (_, task_body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks",
            Some(json!({ "title": "Lab Report", "total_points": 20, "course_id": 5 })),
        ),
    )
    .await;
    let task_id = task_body["id"].as_i64().expect("task id");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks/score",
            Some(json!({ "student_id": 4, "performance_task_id": task_id, "score": 25 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "Score cannot exceed total points (20).");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks/score",
            Some(json!({ "student_id": 4, "performance_task_id": task_id, "score": -1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "All fields are required and score must be a number.");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks/score",
            Some(json!({ "student_id": 4, "performance_task_id": 404, "score": 5 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["message"], "Performance task not found.");
}

#[tokio::test]
async fn test_zero_is_a_recordable_score() {
    let app = setup().await;

    let (_, task_body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks",
            Some(json!({ "title": "Lab Report", "total_points": 20, "course_id": 5 })),
        ),
    )
    .await;
    let task_id = task_body["id"].as_i64().expect("task id");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/performance-tasks/score",
            Some(json!({ "student_id": 4, "performance_task_id": task_id, "score": 0 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["score"], 0);
}
