//! Performance task endpoints: non-assessment graded work recorded per
//! student by faculty.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use aral_core::domain::{CourseId, PerformanceTaskId, StudentId};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{NewPerformanceTask, PerformanceScoreRecord, PerformanceTaskRecord, RecordedScore};

pub fn create_performance_tasks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/performance-tasks", post(create_task))
        .route("/api/performance-tasks/course/{course_id}", get(list_by_course))
        .route("/api/performance-tasks/{id}", delete(delete_task))
        .route("/api/performance-tasks/score", post(record_score))
}

#[derive(Debug, Serialize)]
struct PerformanceTaskView {
    id: i32,
    course_id: i32,
    title: String,
    total_points: i32,
    created_at: NaiveDateTime,
}

impl From<PerformanceTaskRecord> for PerformanceTaskView {
    fn from(record: PerformanceTaskRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            course_id: record.course_id.into_inner(),
            title: record.title,
            total_points: record.total_points,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    total_points: Option<i32>,
    #[serde(default)]
    course_id: Option<i32>,
}

async fn create_task(
    state: State<Arc<AppState>>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<PerformanceTaskView>), ApiError> {
    let title = request.title.filter(|title| !title.is_empty());
    let total_points = request.total_points.filter(|points| *points > 0);
    let course_id = request.course_id.filter(|id| *id != 0);

    let (Some(title), Some(total_points), Some(course_id)) = (title, total_points, course_id)
    else {
        return Err(ApiError::bad_request("All fields are required."));
    };

    let created = state
        .performance
        .create_task(NewPerformanceTask {
            course_id: CourseId::new(course_id),
            title,
            total_points,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn list_by_course(
    state: State<Arc<AppState>>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<PerformanceTaskView>>, ApiError> {
    let tasks = state
        .performance
        .list_tasks_by_course(CourseId::new(course_id))
        .await?;

    Ok(Json(tasks.into_iter().map(PerformanceTaskView::from).collect()))
}

#[derive(Debug, Serialize)]
struct TaskDeleteResponse {
    message: String,
}

async fn delete_task(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<TaskDeleteResponse>, ApiError> {
    let deleted = state
        .performance
        .delete_task(PerformanceTaskId::new(id))
        .await?;
    if !deleted {
        return Err(ApiError::not_found("Performance task not found."));
    }

    Ok(Json(TaskDeleteResponse {
        message: "Performance task deleted successfully.".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct RecordScoreRequest {
    #[serde(default)]
    student_id: Option<i32>,
    #[serde(default)]
    performance_task_id: Option<i32>,
    #[serde(default)]
    score: Option<i32>,
}

#[derive(Debug, Serialize)]
struct PerformanceScoreView {
    id: i32,
    student_id: i32,
    performance_task_id: i32,
    score: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<PerformanceScoreRecord> for PerformanceScoreView {
    fn from(record: PerformanceScoreRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id.into_inner(),
            performance_task_id: record.performance_task_id.into_inner(),
            score: record.score,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

async fn record_score(
    state: State<Arc<AppState>>,
    Json(request): Json<RecordScoreRequest>,
) -> Result<(StatusCode, Json<PerformanceScoreView>), ApiError> {
    let student_id = request.student_id.filter(|id| *id != 0);
    let task_id = request.performance_task_id.filter(|id| *id != 0);
    let score = request.score.filter(|score| *score >= 0);

    let (Some(student_id), Some(task_id), Some(score)) = (student_id, task_id, score) else {
        return Err(ApiError::bad_request(
            "All fields are required and score must be a number.",
        ));
    };

    let recorded = state
        .performance
        .record_score(
            StudentId::new(student_id),
            PerformanceTaskId::new(task_id),
            score,
        )
        .await?;

    match recorded {
        RecordedScore::Recorded(score) => Ok((StatusCode::CREATED, Json(score.into()))),
        RecordedScore::ExceedsTotal { total_points } => Err(ApiError::bad_request(format!(
            "Score cannot exceed total points ({total_points})."
        ))),
        RecordedScore::TaskNotFound => Err(ApiError::not_found("Performance task not found.")),
    }
}
