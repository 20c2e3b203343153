//! Learner-facing endpoints: taking assessments and reading back scores.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use aral_api_types::{
    AssessmentQuestionsResponse, AssessmentView, OptionView, QuestionView, SubmitAttemptRequest,
    SubmitAttemptResponse,
};
use aral_core::domain::{
    AssessmentId, CourseId, LessonId, OptionId, PerformanceTaskId, QuestionId, StudentId,
    attempt_display, score_display,
};

use super::error::ApiError;
use super::lessons::LessonContentView;
use super::state::AppState;
use crate::grading::{AnswerInput, AttemptSubmission};
use crate::randomizer::RandomizedAssessment;

pub fn create_student_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/student/assessment/{assessment_id}/questions",
            get(assessment_questions),
        )
        .route("/api/student/submit-attempt", post(submit_attempt))
        .route(
            "/api/student/lessons-with-content/{course_id}",
            get(lessons_with_content),
        )
        .route(
            "/api/student/score-summary/{course_id}/{student_id}",
            get(score_summary),
        )
}

fn to_assessment_view(assessment: RandomizedAssessment) -> AssessmentView {
    AssessmentView {
        title: assessment.title,
        description: assessment.description,
        total_points: assessment.total_points.value(),
        time_limit: assessment.time_limit,
        assessment_type: assessment.assessment_type,
        questions: assessment
            .questions
            .into_iter()
            .map(|question| QuestionView {
                id: question.id.into_inner(),
                question: question.question,
                question_type: question.question_type.as_str().to_string(),
                points: question.points.value(),
                options: question
                    .options
                    .into_iter()
                    .map(|option| OptionView {
                        id: option.id.into_inner(),
                        description: option.description,
                    })
                    .collect(),
            })
            .collect(),
    }
}

async fn assessment_questions(
    state: State<Arc<AppState>>,
    Path(assessment_id): Path<i32>,
) -> Result<Json<AssessmentQuestionsResponse>, ApiError> {
    let assessment = state
        .randomizer
        .randomized_questions(AssessmentId::new(assessment_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Assessment not found"))?;

    Ok(Json(AssessmentQuestionsResponse::success(to_assessment_view(
        assessment,
    ))))
}

async fn submit_attempt(
    state: State<Arc<AppState>>,
    Json(request): Json<SubmitAttemptRequest>,
) -> Result<Json<SubmitAttemptResponse>, ApiError> {
    let submission = AttemptSubmission {
        student_id: StudentId::new(request.student_id),
        assessment_id: AssessmentId::new(request.assessment_id),
        answers: request
            .answers
            .into_iter()
            .map(|answer| AnswerInput {
                question_id: QuestionId::new(answer.question_id),
                selected_option_id: answer.selected_option_id.map(OptionId::new),
                input_answer: answer.input_answer,
            })
            .collect(),
    };

    let report = state.grader.grade_submission(submission).await?;

    Ok(Json(SubmitAttemptResponse::submitted(report.score)))
}

#[derive(Debug, Deserialize)]
struct LessonsQuery {
    #[serde(default)]
    student_id: Option<i32>,
}

#[derive(Debug, Serialize)]
struct StudentPerformanceView {
    highest_score: Option<i32>,
    score_display: Option<String>,
    attempt_count: u64,
    attempt_display: String,
}

#[derive(Debug, Serialize)]
struct AssessmentSummaryView {
    assessment_id: i32,
    title: String,
    assessment_type: String,
    time_limit: i32,
    attempt_limit: i32,
    date_open: Option<NaiveDateTime>,
    date_close: Option<NaiveDateTime>,
    total_questions: u64,
    total_points: i32,
    student_performance: Option<StudentPerformanceView>,
}

#[derive(Debug, Serialize)]
struct LessonWithAssessmentsView {
    id: i32,
    course_id: i32,
    title: String,
    description: Option<String>,
    order_no: i32,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    content: Option<LessonContentView>,
    assessments: Vec<AssessmentSummaryView>,
}

#[derive(Debug, Serialize)]
struct LessonsWithContentResponse {
    status: String,
    lessons: Vec<LessonWithAssessmentsView>,
    student_id: Option<i32>,
}

async fn lessons_with_content(
    state: State<Arc<AppState>>,
    Path(course_id): Path<i32>,
    Query(query): Query<LessonsQuery>,
) -> Result<Json<LessonsWithContentResponse>, ApiError> {
    let course_id = CourseId::new(course_id);
    let lessons = state.lessons.list_by_course(course_id).await?;
    let assessments = state.assessments.list_by_course(course_id).await?;

    let assessment_ids: Vec<AssessmentId> =
        assessments.iter().map(|assessment| assessment.id).collect();
    let question_counts = state.assessments.question_counts(&assessment_ids).await?;

    let student_id = query.student_id.map(StudentId::new);
    // Per assessment: highest score seen and number of attempts.
    let mut performance: HashMap<AssessmentId, (i32, u64)> = HashMap::new();
    if let Some(student_id) = student_id {
        for attempt in state
            .attempts
            .list_for_student(student_id, &assessment_ids)
            .await?
        {
            let entry = performance.entry(attempt.assessment_id).or_insert((attempt.score, 0));
            entry.0 = entry.0.max(attempt.score);
            entry.1 += 1;
        }
    }

    let mut assessments_by_lesson: HashMap<LessonId, Vec<AssessmentSummaryView>> = HashMap::new();
    for assessment in assessments {
        let total_questions = question_counts.get(&assessment.id).copied().unwrap_or(0);
        let student_performance = student_id.map(|_| {
            let best = performance.get(&assessment.id).copied();
            StudentPerformanceView {
                highest_score: best.map(|(score, _)| score),
                score_display: best
                    .map(|(score, _)| score_display(score, assessment.total_points.value())),
                attempt_count: best.map(|(_, count)| count).unwrap_or(0),
                attempt_display: attempt_display(
                    best.map(|(_, count)| count).unwrap_or(0),
                    assessment.attempt_limit,
                ),
            }
        });

        assessments_by_lesson
            .entry(assessment.lesson_id)
            .or_default()
            .push(AssessmentSummaryView {
                assessment_id: assessment.id.into_inner(),
                title: assessment.title,
                assessment_type: assessment.assessment_type,
                time_limit: assessment.time_limit,
                attempt_limit: assessment.attempt_limit,
                date_open: assessment.date_open,
                date_close: assessment.date_close,
                total_questions,
                total_points: assessment.total_points.value(),
                student_performance,
            });
    }

    let lessons = lessons
        .into_iter()
        .map(|entry| {
            let assessments = assessments_by_lesson
                .remove(&entry.lesson.id)
                .unwrap_or_default();
            LessonWithAssessmentsView {
                id: entry.lesson.id.into_inner(),
                course_id: entry.lesson.course_id.into_inner(),
                title: entry.lesson.title,
                description: entry.lesson.description,
                order_no: entry.lesson.order_no,
                is_active: entry.lesson.is_active,
                created_at: entry.lesson.created_at,
                updated_at: entry.lesson.updated_at,
                content: entry.content.map(LessonContentView::from),
                assessments,
            }
        })
        .collect();

    Ok(Json(LessonsWithContentResponse {
        status: "success".to_string(),
        lessons,
        student_id: query.student_id,
    }))
}

#[derive(Debug, Serialize)]
struct ScoreSummaryEntry {
    title: String,
    score: i32,
    total_points: i32,
}

#[derive(Debug, Serialize)]
struct ScoreSummaryResponse {
    status: String,
    assessments: Vec<ScoreSummaryEntry>,
}

/// Assessment scores use the student's first attempt; performance tasks use
/// the recorded score. Both fall back to zero when nothing is stored.
async fn score_summary(
    state: State<Arc<AppState>>,
    Path((course_id, student_id)): Path<(i32, i32)>,
) -> Result<Json<ScoreSummaryResponse>, ApiError> {
    let course_id = CourseId::new(course_id);
    let student_id = StudentId::new(student_id);

    let assessments = state.assessments.list_by_course(course_id).await?;
    let assessment_ids: Vec<AssessmentId> =
        assessments.iter().map(|assessment| assessment.id).collect();

    let mut first_scores: HashMap<AssessmentId, i32> = HashMap::new();
    for attempt in state
        .attempts
        .list_for_student(student_id, &assessment_ids)
        .await?
    {
        first_scores.entry(attempt.assessment_id).or_insert(attempt.score);
    }

    let tasks = state.performance.list_tasks_by_course(course_id).await?;
    let task_ids: Vec<PerformanceTaskId> = tasks.iter().map(|task| task.id).collect();
    let mut task_scores: HashMap<PerformanceTaskId, i32> = HashMap::new();
    for recorded in state
        .performance
        .scores_for_student(student_id, &task_ids)
        .await?
    {
        task_scores.insert(recorded.performance_task_id, recorded.score);
    }

    let mut entries: Vec<ScoreSummaryEntry> = assessments
        .into_iter()
        .map(|assessment| ScoreSummaryEntry {
            title: assessment.title,
            score: first_scores.get(&assessment.id).copied().unwrap_or(0),
            total_points: assessment.total_points.value(),
        })
        .collect();
    entries.extend(tasks.into_iter().map(|task| ScoreSummaryEntry {
        title: task.title,
        score: task_scores.get(&task.id).copied().unwrap_or(0),
        total_points: task.total_points,
    }));

    Ok(Json(ScoreSummaryResponse {
        status: "success".to_string(),
        assessments: entries,
    }))
}
