//! Assessment builder endpoints for faculty. Unlike the learner-facing
//! fetch, these views include option correctness flags.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use aral_core::domain::{AssessmentId, CourseId, LessonId, QuestionId, QuestionType};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{
    AssessmentRecord, AssessmentUpdate, NewAssessment, NewOption, NewQuestion, OptionRecord,
    QuestionRecord, QuestionUpdate,
};

pub fn create_assessments_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/assessments", post(create_assessment))
        .route("/api/assessments/{id}", get(get_assessment))
        .route("/api/assessments/{id}", put(update_assessment))
        .route("/api/assessments/{id}", delete(delete_assessment))
        .route("/api/assessments/lesson/{lesson_id}", get(list_by_lesson))
        .route("/api/assessments/course/{course_id}", get(list_by_course))
}

#[derive(Debug, Serialize)]
struct AssessmentRowView {
    id: i32,
    course_id: i32,
    lesson_id: i32,
    title: String,
    description: Option<String>,
    assessment_type: String,
    total_points: i32,
    time_limit: i32,
    attempt_limit: i32,
    date_open: Option<NaiveDateTime>,
    date_close: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<AssessmentRecord> for AssessmentRowView {
    fn from(record: AssessmentRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            course_id: record.course_id.into_inner(),
            lesson_id: record.lesson_id.into_inner(),
            title: record.title,
            description: record.description,
            assessment_type: record.assessment_type,
            total_points: record.total_points.value(),
            time_limit: record.time_limit,
            attempt_limit: record.attempt_limit,
            date_open: record.date_open,
            date_close: record.date_close,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct QuestionRowView {
    id: i32,
    assessment_id: i32,
    question: String,
    #[serde(rename = "type")]
    question_type: String,
    points: i32,
}

impl From<QuestionRecord> for QuestionRowView {
    fn from(record: QuestionRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            assessment_id: record.assessment_id.into_inner(),
            question: record.question,
            question_type: record.question_type.as_str().to_string(),
            points: record.points.value(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OptionRowView {
    id: i32,
    question_id: i32,
    description: Option<String>,
    is_correct: bool,
}

impl From<OptionRecord> for OptionRowView {
    fn from(record: OptionRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            question_id: record.question_id.into_inner(),
            description: record.description,
            is_correct: record.is_correct,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssessmentPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    assessment_type: Option<String>,
    #[serde(default)]
    total_points: Option<i32>,
    #[serde(default)]
    time_limit: Option<i32>,
    #[serde(default)]
    attempt_limit: Option<i32>,
    #[serde(default)]
    course_id: Option<i32>,
    #[serde(default)]
    lesson_id: Option<i32>,
    #[serde(default)]
    questions: Vec<QuestionPayload>,
    #[serde(default)]
    date_open: Option<NaiveDateTime>,
    #[serde(default)]
    date_close: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    #[serde(default)]
    id: Option<i32>,
    question: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    points: Option<i32>,
    #[serde(default)]
    options: Vec<OptionPayload>,
}

#[derive(Debug, Deserialize)]
struct OptionPayload {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_correct: bool,
}

/// Required fields checked the way the original service does: missing,
/// empty or zero all count as absent.
struct ValidatedPayload {
    course_id: CourseId,
    lesson_id: LessonId,
    title: String,
    assessment_type: String,
}

fn validate_payload(payload: &AssessmentPayload) -> Result<ValidatedPayload, ApiError> {
    let title = payload.title.clone().filter(|title| !title.is_empty());
    let assessment_type = payload
        .assessment_type
        .clone()
        .filter(|kind| !kind.is_empty());
    let course_id = payload.course_id.filter(|id| *id != 0);
    let lesson_id = payload.lesson_id.filter(|id| *id != 0);

    match (title, assessment_type, course_id, lesson_id) {
        (Some(title), Some(assessment_type), Some(course_id), Some(lesson_id)) => {
            Ok(ValidatedPayload {
                course_id: CourseId::new(course_id),
                lesson_id: LessonId::new(lesson_id),
                title,
                assessment_type,
            })
        }
        _ => Err(ApiError::bad_request(
            "Title, assessment type, course ID, and lesson ID are required",
        )),
    }
}

fn parse_question_type(value: &str) -> Result<QuestionType, ApiError> {
    value
        .parse::<QuestionType>()
        .map_err(|err| ApiError::bad_request(err.to_string()))
}

fn to_new_options(options: Vec<OptionPayload>) -> Vec<NewOption> {
    options
        .into_iter()
        .map(|option| NewOption {
            description: option.description,
            is_correct: option.is_correct,
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct CreatedAssessmentResponse {
    assessment: AssessmentRowView,
    questions: Vec<QuestionRowView>,
}

async fn create_assessment(
    state: State<Arc<AppState>>,
    Json(payload): Json<AssessmentPayload>,
) -> Result<(StatusCode, Json<CreatedAssessmentResponse>), ApiError> {
    let validated = validate_payload(&payload)?;
    if payload.questions.is_empty() {
        return Err(ApiError::bad_request("At least one question is required"));
    }

    let mut questions = Vec::with_capacity(payload.questions.len());
    for question in payload.questions {
        questions.push(NewQuestion {
            question: question.question,
            question_type: parse_question_type(&question.question_type)?,
            points: question.points.filter(|points| *points != 0),
            options: to_new_options(question.options),
        });
    }

    let created = state
        .assessments
        .create(NewAssessment {
            course_id: validated.course_id,
            lesson_id: validated.lesson_id,
            title: validated.title,
            description: payload.description,
            assessment_type: validated.assessment_type,
            total_points: payload.total_points.filter(|points| *points != 0),
            time_limit: payload.time_limit.filter(|limit| *limit != 0),
            attempt_limit: payload.attempt_limit.filter(|limit| *limit != 0),
            date_open: payload.date_open,
            date_close: payload.date_close,
            questions,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedAssessmentResponse {
            assessment: created.assessment.into(),
            questions: created
                .questions
                .into_iter()
                .map(QuestionRowView::from)
                .collect(),
        }),
    ))
}

#[derive(Debug, Serialize)]
struct QuestionWithOptionsView {
    id: i32,
    assessment_id: i32,
    question: String,
    #[serde(rename = "type")]
    question_type: String,
    points: i32,
    options: Vec<OptionRowView>,
}

#[derive(Debug, Serialize)]
struct AssessmentDetailResponse {
    #[serde(flatten)]
    assessment: AssessmentRowView,
    questions: Vec<QuestionWithOptionsView>,
}

async fn get_assessment(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<AssessmentDetailResponse>, ApiError> {
    let detail = state
        .assessments
        .find_detail(AssessmentId::new(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Assessment not found"))?;

    let questions = detail
        .questions
        .into_iter()
        .map(|entry| QuestionWithOptionsView {
            id: entry.question.id.into_inner(),
            assessment_id: entry.question.assessment_id.into_inner(),
            question: entry.question.question,
            question_type: entry.question.question_type.as_str().to_string(),
            points: entry.question.points.value(),
            options: entry.options.into_iter().map(OptionRowView::from).collect(),
        })
        .collect();

    Ok(Json(AssessmentDetailResponse {
        assessment: detail.assessment.into(),
        questions,
    }))
}

async fn list_by_lesson(
    state: State<Arc<AppState>>,
    Path(lesson_id): Path<i32>,
) -> Result<Json<Vec<AssessmentRowView>>, ApiError> {
    let assessments = state
        .assessments
        .list_by_lesson(LessonId::new(lesson_id))
        .await?;

    Ok(Json(assessments.into_iter().map(AssessmentRowView::from).collect()))
}

async fn list_by_course(
    state: State<Arc<AppState>>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<AssessmentRowView>>, ApiError> {
    let assessments = state
        .assessments
        .list_by_course(CourseId::new(course_id))
        .await?;

    Ok(Json(assessments.into_iter().map(AssessmentRowView::from).collect()))
}

#[derive(Debug, Serialize)]
struct UpdatedAssessmentResponse {
    message: String,
    assessment: AssessmentRowView,
}

async fn update_assessment(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AssessmentPayload>,
) -> Result<Json<UpdatedAssessmentResponse>, ApiError> {
    let validated = validate_payload(&payload)?;
    if payload.questions.is_empty() {
        return Err(ApiError::bad_request("At least one question is required"));
    }

    let mut questions = Vec::with_capacity(payload.questions.len());
    for question in payload.questions {
        questions.push(QuestionUpdate {
            id: question.id.map(QuestionId::new),
            question: question.question,
            question_type: parse_question_type(&question.question_type)?,
            points: question.points.filter(|points| *points != 0),
            options: to_new_options(question.options),
        });
    }

    let updated = state
        .assessments
        .update(
            AssessmentId::new(id),
            AssessmentUpdate {
                course_id: validated.course_id,
                lesson_id: validated.lesson_id,
                title: validated.title,
                description: payload.description,
                assessment_type: validated.assessment_type,
                total_points: payload.total_points.filter(|points| *points != 0),
                time_limit: payload.time_limit.filter(|limit| *limit != 0),
                attempt_limit: payload.attempt_limit.filter(|limit| *limit != 0),
                date_open: payload.date_open,
                date_close: payload.date_close,
                questions,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Assessment not found"))?;

    Ok(Json(UpdatedAssessmentResponse {
        message: "Assessment updated".to_string(),
        assessment: updated.into(),
    }))
}

async fn delete_assessment(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.assessments.delete(AssessmentId::new(id)).await?;
    if !deleted {
        return Err(ApiError::not_found("Assessment not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
