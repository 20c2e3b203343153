pub mod assessment_repository;
pub mod attempt_repository;
pub mod lesson_repository;
pub mod performance_repository;

pub use assessment_repository::{
    AssessmentDetail, AssessmentRecord, AssessmentRepository, AssessmentUpdate, CreatedAssessment,
    NewAssessment, NewOption, NewQuestion, OptionRecord, QuestionRecord, QuestionUpdate,
    QuestionWithOptions, SeaOrmAssessmentRepository,
};
pub use attempt_repository::{
    AnswerDetail, AttemptDetail, AttemptRecord, AttemptRepository, ScoreUpdate,
    SeaOrmAttemptRepository,
};
pub use lesson_repository::{
    LessonContentRecord, LessonCreate, LessonRecord, LessonRepository, LessonUpdate,
    LessonWithContent, NewLesson, SeaOrmLessonRepository, UpdateLesson,
};
pub use performance_repository::{
    NewPerformanceTask, PerformanceRepository, PerformanceScoreRecord, PerformanceTaskRecord,
    RecordedScore, SeaOrmPerformanceRepository,
};

use anyhow::{Result, anyhow};
use aral_core::domain::QuestionType;

pub(crate) fn map_question_type(code: i16) -> Result<QuestionType> {
    match code {
        0 => Ok(QuestionType::SingleChoice),
        1 => Ok(QuestionType::TrueFalse),
        2 => Ok(QuestionType::Identification),
        3 => Ok(QuestionType::Essay),
        _ => Err(anyhow!("invalid question.question_type code from database: {code}")),
    }
}

pub(crate) fn map_question_type_code(question_type: QuestionType) -> i16 {
    match question_type {
        QuestionType::SingleChoice => 0,
        QuestionType::TrueFalse => 1,
        QuestionType::Identification => 2,
        QuestionType::Essay => 3,
    }
}
