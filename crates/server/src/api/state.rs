//! Shared application state.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::grading::{AttemptGrader, SeaOrmAttemptGrader};
use crate::randomizer::{QuestionRandomizer, SeaOrmQuestionRandomizer};
use crate::repository::{
    AssessmentRepository, AttemptRepository, LessonRepository, PerformanceRepository,
    SeaOrmAssessmentRepository, SeaOrmAttemptRepository, SeaOrmLessonRepository,
    SeaOrmPerformanceRepository,
};

/// Everything the routers share. Repositories and services are held behind
/// trait objects so tests can drive handlers with fakes.
#[derive(Clone)]
pub struct AppState {
    pub lessons: Arc<dyn LessonRepository>,
    pub assessments: Arc<dyn AssessmentRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub performance: Arc<dyn PerformanceRepository>,
    pub randomizer: Arc<dyn QuestionRandomizer>,
    pub grader: Arc<dyn AttemptGrader>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            lessons: Arc::new(SeaOrmLessonRepository::new(db.clone())),
            assessments: Arc::new(SeaOrmAssessmentRepository::new(db.clone())),
            attempts: Arc::new(SeaOrmAttemptRepository::new(db.clone())),
            performance: Arc::new(SeaOrmPerformanceRepository::new(db.clone())),
            randomizer: Arc::new(SeaOrmQuestionRandomizer::new(db.clone())),
            grader: Arc::new(SeaOrmAttemptGrader::new(db)),
        }
    }
}
