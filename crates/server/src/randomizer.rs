use std::collections::HashMap;

use anyhow::Result;
use aral_core::domain::{AssessmentId, OptionId, Points, QuestionId, QuestionType};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::{assessment, question, question_option};
use crate::repository::map_question_type;

/// One question as handed to a learner: no correctness flags anywhere.
#[derive(Debug, Clone)]
pub struct RandomizedOption {
    pub id: OptionId,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RandomizedQuestion {
    pub id: QuestionId,
    pub question: String,
    pub question_type: QuestionType,
    pub points: Points,
    pub options: Vec<RandomizedOption>,
}

#[derive(Debug, Clone)]
pub struct RandomizedAssessment {
    pub title: String,
    pub description: Option<String>,
    pub total_points: Points,
    pub time_limit: i32,
    pub assessment_type: String,
    pub questions: Vec<RandomizedQuestion>,
}

#[async_trait]
pub trait QuestionRandomizer: Send + Sync {
    /// Fetches an assessment for taking, with its questions in a fresh
    /// random order on every call. Options keep their stored order.
    async fn randomized_questions(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Option<RandomizedAssessment>>;
}

#[derive(Clone)]
pub struct SeaOrmQuestionRandomizer {
    db: DatabaseConnection,
}

impl SeaOrmQuestionRandomizer {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuestionRandomizer for SeaOrmQuestionRandomizer {
    async fn randomized_questions(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Option<RandomizedAssessment>> {
        let Some(assessment_model) = assessment::Entity::find_by_id(assessment_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let question_models = question::Entity::find()
            .filter(question::Column::AssessmentId.eq(assessment_model.id))
            .order_by_asc(question::Column::Id)
            .all(&self.db)
            .await?;

        let mut options_by_question: HashMap<i32, Vec<RandomizedOption>> = HashMap::new();
        if !question_models.is_empty() {
            let option_models = question_option::Entity::find()
                .filter(
                    question_option::Column::QuestionId
                        .is_in(question_models.iter().map(|question| question.id)),
                )
                .order_by_asc(question_option::Column::Id)
                .all(&self.db)
                .await?;

            for option_model in option_models {
                options_by_question
                    .entry(option_model.question_id)
                    .or_default()
                    .push(RandomizedOption {
                        id: OptionId::new(option_model.id),
                        description: option_model.description,
                    });
            }
        }

        let mut questions = question_models
            .into_iter()
            .map(|question_model| {
                let options = options_by_question
                    .remove(&question_model.id)
                    .unwrap_or_default();
                Ok(RandomizedQuestion {
                    id: QuestionId::new(question_model.id),
                    question: question_model.question,
                    question_type: map_question_type(question_model.question_type)?,
                    points: Points::new(question_model.points)?,
                    options,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        questions.shuffle(&mut rand::thread_rng());

        Ok(Some(RandomizedAssessment {
            title: assessment_model.title,
            description: assessment_model.description,
            total_points: Points::new(assessment_model.total_points)?,
            time_limit: assessment_model.time_limit,
            assessment_type: assessment_model.assessment_type,
            questions,
        }))
    }
}
