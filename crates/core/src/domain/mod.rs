mod error;
mod grading;
mod ids;
mod points;
mod question_type;
mod reporting;

pub use error::DomainError;
pub use grading::{
    AnswerOutcome, AttemptReport, CorrectOption, SubmittedAnswer, match_free_text,
    normalize_free_text,
};
pub use ids::{
    AssessmentId, AttemptId, CourseId, LessonId, OptionId, PerformanceTaskId, QuestionId,
    StudentId,
};
pub use points::Points;
pub use question_type::QuestionType;
pub use reporting::{AnswerCorrectness, answer_score_display, attempt_display, score_display};
