//! Faculty views over student attempts: best-attempt review and the manual
//! score override used to grade essays.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use aral_core::domain::{
    AnswerCorrectness, AssessmentId, AttemptId, StudentId, answer_score_display,
};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{AttemptDetail, AttemptRecord, ScoreUpdate};

pub fn create_attempts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/attempts/{student_id}/{assessment_id}", get(best_attempt))
        .route("/api/attempts/score/{attempt_id}", patch(update_score))
}

#[derive(Debug, Serialize)]
struct AttemptRowView {
    id: i32,
    student_id: i32,
    assessment_id: i32,
    started_at: NaiveDateTime,
    submitted_at: Option<NaiveDateTime>,
    score: i32,
}

impl From<AttemptRecord> for AttemptRowView {
    fn from(record: AttemptRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            student_id: record.student_id.into_inner(),
            assessment_id: record.assessment_id.into_inner(),
            started_at: record.started_at,
            submitted_at: record.submitted_at,
            score: record.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct AttemptAssessmentView {
    id: i32,
    title: String,
    assessment_type: String,
    course_id: i32,
    lesson_id: i32,
    total_points: i32,
    date_open: Option<NaiveDateTime>,
    date_close: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
struct AnswerQuestionView {
    id: i32,
    question: String,
    points: i32,
    #[serde(rename = "type")]
    question_type: String,
}

#[derive(Debug, Serialize)]
struct AnswerOptionView {
    id: i32,
    description: Option<String>,
    is_correct: bool,
}

#[derive(Debug, Serialize)]
struct AnswerReviewView {
    question: AnswerQuestionView,
    selected_option: Option<AnswerOptionView>,
    input_answer: Option<String>,
    is_correct: &'static str,
    display_score: String,
}

#[derive(Debug, Serialize)]
struct BestAttemptResponse {
    #[serde(flatten)]
    attempt: AttemptRowView,
    assessment: AttemptAssessmentView,
    answers: Vec<AnswerReviewView>,
}

#[derive(Debug, Serialize)]
struct NoAttemptResponse {
    message: String,
    answers: Vec<AnswerReviewView>,
}

fn to_best_attempt_response(detail: AttemptDetail) -> BestAttemptResponse {
    let answers = detail
        .answers
        .into_iter()
        .map(|answer| {
            let question_type = answer.question.question_type;
            AnswerReviewView {
                question: AnswerQuestionView {
                    id: answer.question.id.into_inner(),
                    question: answer.question.question,
                    points: answer.question.points.value(),
                    question_type: question_type.as_str().to_string(),
                },
                selected_option: answer.selected_option.map(|option| AnswerOptionView {
                    id: option.id.into_inner(),
                    description: option.description,
                    is_correct: option.is_correct,
                }),
                input_answer: answer.input_answer,
                is_correct: AnswerCorrectness::from_graded(question_type, answer.is_correct)
                    .as_str(),
                display_score: answer_score_display(
                    question_type,
                    answer.is_correct,
                    answer.question.points,
                ),
            }
        })
        .collect();

    BestAttemptResponse {
        attempt: detail.attempt.into(),
        assessment: AttemptAssessmentView {
            id: detail.assessment.id.into_inner(),
            title: detail.assessment.title,
            assessment_type: detail.assessment.assessment_type,
            course_id: detail.assessment.course_id.into_inner(),
            lesson_id: detail.assessment.lesson_id.into_inner(),
            total_points: detail.assessment.total_points.value(),
            date_open: detail.assessment.date_open,
            date_close: detail.assessment.date_close,
        },
        answers,
    }
}

async fn best_attempt(
    state: State<Arc<AppState>>,
    Path((student_id, assessment_id)): Path<(i32, i32)>,
) -> Result<Response, ApiError> {
    let detail = state
        .attempts
        .best_attempt(StudentId::new(student_id), AssessmentId::new(assessment_id))
        .await?;

    match detail {
        Some(detail) => Ok(Json(to_best_attempt_response(detail)).into_response()),
        None => Ok(Json(NoAttemptResponse {
            message: "No student attempt yet.".to_string(),
            answers: Vec::new(),
        })
        .into_response()),
    }
}

#[derive(Debug, Deserialize)]
struct UpdateScoreRequest {
    #[serde(default)]
    score: Option<i32>,
}

#[derive(Debug, Serialize)]
struct UpdateScoreResponse {
    message: String,
    attempt: AttemptRowView,
}

async fn update_score(
    state: State<Arc<AppState>>,
    Path(attempt_id): Path<i32>,
    Json(request): Json<UpdateScoreRequest>,
) -> Result<Json<UpdateScoreResponse>, ApiError> {
    let Some(score) = request.score.filter(|score| *score >= 0) else {
        return Err(ApiError::bad_request("Invalid attempt ID or score."));
    };

    let updated = state
        .attempts
        .update_score(AttemptId::new(attempt_id), score)
        .await?;

    match updated {
        ScoreUpdate::Updated(attempt) => Ok(Json(UpdateScoreResponse {
            message: "Score updated successfully.".to_string(),
            attempt: attempt.into(),
        })),
        ScoreUpdate::ExceedsTotal { total_points } => Err(ApiError::bad_request(format!(
            "Score cannot exceed total points ({total_points})."
        ))),
        ScoreUpdate::NotFound => Err(ApiError::not_found("User attempt not found.")),
    }
}
