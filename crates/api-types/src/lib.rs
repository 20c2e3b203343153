//! Shared request/response types for the assessment-taking API.

use serde::{Deserialize, Serialize};

/// Assessment as handed to a learner about to take it. Options never carry
/// their correctness flag here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentQuestionsResponse {
    pub status: String,
    pub assessment: AssessmentView,
}

impl AssessmentQuestionsResponse {
    #[must_use]
    pub fn success(assessment: AssessmentView) -> Self {
        Self {
            status: "success".to_string(),
            assessment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentView {
    pub title: String,
    pub description: Option<String>,
    pub total_points: i32,
    pub time_limit: i32,
    pub assessment_type: String,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: i32,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub points: i32,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub id: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAttemptRequest {
    pub student_id: i32,
    pub assessment_id: i32,
    pub answers: Vec<AnswerSubmission>,
}

/// One answer in a submission: a selected option, free-text input, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: i32,
    #[serde(default)]
    pub selected_option_id: Option<i32>,
    #[serde(default)]
    pub input_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAttemptResponse {
    pub status: String,
    pub message: String,
    pub score: i32,
}

impl SubmitAttemptResponse {
    #[must_use]
    pub fn submitted(score: i32) -> Self {
        Self {
            status: "success".to_string(),
            message: "Attempt submitted".to_string(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
