//! Lesson builder endpoints for faculty.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use aral_core::domain::{CourseId, LessonId};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{
    LessonContentRecord, LessonCreate, LessonRecord, LessonUpdate, LessonWithContent, NewLesson,
    UpdateLesson,
};

pub fn create_lessons_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/lessons", post(create_lesson))
        .route("/api/lessons/{id}", get(get_lesson))
        .route("/api/lessons/{id}", put(update_lesson))
        .route("/api/lessons/{id}", delete(delete_lesson))
        .route("/api/lessons/course/{course_id}", get(list_lessons_by_course))
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonView {
    pub(crate) id: i32,
    pub(crate) course_id: i32,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) order_no: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) updated_at: NaiveDateTime,
}

impl From<LessonRecord> for LessonView {
    fn from(record: LessonRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            course_id: record.course_id.into_inner(),
            title: record.title,
            description: record.description,
            order_no: record.order_no,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonContentView {
    pub(crate) id: i32,
    pub(crate) lesson_id: i32,
    pub(crate) attachment_link_1: Option<String>,
    pub(crate) attachment_link_2: Option<String>,
    pub(crate) attachment_link_3: Option<String>,
    pub(crate) attachment_link_4: Option<String>,
}

impl From<LessonContentRecord> for LessonContentView {
    fn from(record: LessonContentRecord) -> Self {
        Self {
            id: record.id,
            lesson_id: record.lesson_id.into_inner(),
            attachment_link_1: record.attachment_link_1,
            attachment_link_2: record.attachment_link_2,
            attachment_link_3: record.attachment_link_3,
            attachment_link_4: record.attachment_link_4,
        }
    }
}

#[derive(Debug, Serialize)]
struct LessonWithContentView {
    id: i32,
    course_id: i32,
    title: String,
    description: Option<String>,
    order_no: i32,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    content: Option<LessonContentView>,
}

impl From<LessonWithContent> for LessonWithContentView {
    fn from(entry: LessonWithContent) -> Self {
        Self {
            id: entry.lesson.id.into_inner(),
            course_id: entry.lesson.course_id.into_inner(),
            title: entry.lesson.title,
            description: entry.lesson.description,
            order_no: entry.lesson.order_no,
            is_active: entry.lesson.is_active,
            created_at: entry.lesson.created_at,
            updated_at: entry.lesson.updated_at,
            content: entry.content.map(LessonContentView::from),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateLessonRequest {
    course_id: i32,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    order_no: Option<i32>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    attachment_links: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LessonMutationResponse {
    message: String,
    lesson: LessonView,
}

async fn create_lesson(
    state: State<Arc<AppState>>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<LessonMutationResponse>), ApiError> {
    let Some(order_no) = request.order_no else {
        return Err(ApiError::bad_request(
            "Missing or invalid 'order_no' in request body.",
        ));
    };

    let created = state
        .lessons
        .create(NewLesson {
            course_id: CourseId::new(request.course_id),
            title: request.title,
            description: request.description,
            order_no,
            is_active: request.is_active,
            attachment_links: request.attachment_links,
        })
        .await?;

    match created {
        LessonCreate::Created(lesson) => Ok((
            StatusCode::CREATED,
            Json(LessonMutationResponse {
                message: "Lesson created successfully".to_string(),
                lesson: lesson.into(),
            }),
        )),
        LessonCreate::OrderNoTaken => Err(ApiError::conflict(format!(
            "Order number {order_no} is already used in this course."
        ))),
    }
}

#[derive(Debug, Serialize)]
struct LessonDetailResponse {
    lesson: LessonWithContentView,
}

async fn get_lesson(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<LessonDetailResponse>, ApiError> {
    let entry = state
        .lessons
        .find_with_content(LessonId::new(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Lesson not found"))?;

    Ok(Json(LessonDetailResponse { lesson: entry.into() }))
}

#[derive(Debug, Serialize)]
struct LessonListResponse {
    lessons: Vec<LessonWithContentView>,
}

async fn list_lessons_by_course(
    state: State<Arc<AppState>>,
    Path(course_id): Path<i32>,
) -> Result<Json<LessonListResponse>, ApiError> {
    let lessons = state
        .lessons
        .list_by_course(CourseId::new(course_id))
        .await?;

    Ok(Json(LessonListResponse {
        lessons: lessons.into_iter().map(LessonWithContentView::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
struct UpdateLessonRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    order_no: Option<i32>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    attachment_links: Vec<String>,
}

async fn update_lesson(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLessonRequest>,
) -> Result<Json<LessonMutationResponse>, ApiError> {
    let Some(order_no) = request.order_no else {
        return Err(ApiError::bad_request(
            "Missing or invalid 'order_no' in request body.",
        ));
    };

    let updated = state
        .lessons
        .update(
            LessonId::new(id),
            UpdateLesson {
                title: request.title,
                description: request.description,
                order_no,
                is_active: request.is_active,
                attachment_links: request.attachment_links,
            },
        )
        .await?;

    match updated {
        LessonUpdate::Updated(lesson) => Ok(Json(LessonMutationResponse {
            message: "Lesson updated successfully".to_string(),
            lesson: lesson.into(),
        })),
        LessonUpdate::OrderNoTaken => Err(ApiError::conflict(format!(
            "Order number {order_no} is already used in this course."
        ))),
        LessonUpdate::NotFound => Err(ApiError::not_found("Lesson not found")),
    }
}

#[derive(Debug, Serialize)]
struct LessonDeleteResponse {
    message: String,
}

async fn delete_lesson(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<LessonDeleteResponse>, ApiError> {
    let deleted = state.lessons.delete(LessonId::new(id)).await?;
    if !deleted {
        return Err(ApiError::not_found("Lesson not found"));
    }

    Ok(Json(LessonDeleteResponse {
        message: "Lesson and all related data deleted successfully".to_string(),
    }))
}
