use std::collections::HashMap;

use crate::entity::{answer, assessment, attempt, question, question_option};
use anyhow::{Result, anyhow};
use aral_core::domain::{AssessmentId, AttemptId, StudentId};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use super::assessment_repository::{
    AssessmentRecord, OptionRecord, QuestionRecord, map_assessment, map_option, map_question,
};

#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub id: AttemptId,
    pub student_id: StudentId,
    pub assessment_id: AssessmentId,
    pub started_at: NaiveDateTime,
    pub submitted_at: Option<NaiveDateTime>,
    pub score: i32,
}

#[derive(Debug, Clone)]
pub struct AnswerDetail {
    pub question: QuestionRecord,
    pub selected_option: Option<OptionRecord>,
    pub input_answer: Option<String>,
    pub is_correct: bool,
}

/// Highest-score attempt with everything the review screen needs.
#[derive(Debug, Clone)]
pub struct AttemptDetail {
    pub attempt: AttemptRecord,
    pub assessment: AssessmentRecord,
    pub answers: Vec<AnswerDetail>,
}

#[derive(Debug)]
pub enum ScoreUpdate {
    Updated(AttemptRecord),
    ExceedsTotal { total_points: i32 },
    NotFound,
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn best_attempt(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<Option<AttemptDetail>>;
    async fn list_for_student(
        &self,
        student_id: StudentId,
        assessment_ids: &[AssessmentId],
    ) -> Result<Vec<AttemptRecord>>;
    async fn update_score(&self, attempt_id: AttemptId, score: i32) -> Result<ScoreUpdate>;
}

#[derive(Clone)]
pub struct SeaOrmAttemptRepository {
    db: DatabaseConnection,
}

impl SeaOrmAttemptRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn map_attempt(model: attempt::Model) -> AttemptRecord {
    AttemptRecord {
        id: AttemptId::new(model.id),
        student_id: StudentId::new(model.student_id),
        assessment_id: AssessmentId::new(model.assessment_id),
        started_at: model.started_at,
        submitted_at: model.submitted_at,
        score: model.score,
    }
}

#[async_trait]
impl AttemptRepository for SeaOrmAttemptRepository {
    async fn best_attempt(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<Option<AttemptDetail>> {
        let Some(attempt_model) = attempt::Entity::find()
            .filter(attempt::Column::StudentId.eq(student_id.into_inner()))
            .filter(attempt::Column::AssessmentId.eq(assessment_id.into_inner()))
            .order_by_desc(attempt::Column::Score)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let assessment_model = assessment::Entity::find_by_id(attempt_model.assessment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                anyhow!("assessment {} missing for attempt {}", attempt_model.assessment_id, attempt_model.id)
            })?;

        let answer_models = answer::Entity::find()
            .filter(answer::Column::AttemptId.eq(attempt_model.id))
            .order_by_asc(answer::Column::Id)
            .all(&self.db)
            .await?;

        let mut questions_by_id: HashMap<i32, QuestionRecord> = HashMap::new();
        let mut options_by_id: HashMap<i32, OptionRecord> = HashMap::new();
        if !answer_models.is_empty() {
            let question_models = question::Entity::find()
                .filter(
                    question::Column::Id
                        .is_in(answer_models.iter().map(|answer| answer.question_id)),
                )
                .all(&self.db)
                .await?;
            for question_model in question_models {
                questions_by_id.insert(question_model.id, map_question(question_model)?);
            }

            let selected_ids: Vec<i32> = answer_models
                .iter()
                .filter_map(|answer| answer.selected_option_id)
                .collect();
            if !selected_ids.is_empty() {
                let option_models = question_option::Entity::find()
                    .filter(question_option::Column::Id.is_in(selected_ids))
                    .all(&self.db)
                    .await?;
                for option_model in option_models {
                    options_by_id.insert(option_model.id, map_option(option_model));
                }
            }
        }

        let answers = answer_models
            .into_iter()
            .map(|answer_model| {
                let question = questions_by_id
                    .get(&answer_model.question_id)
                    .cloned()
                    .ok_or_else(|| {
                        anyhow!(
                            "question {} missing for answer {}",
                            answer_model.question_id,
                            answer_model.id
                        )
                    })?;
                let selected_option = answer_model
                    .selected_option_id
                    .and_then(|option_id| options_by_id.get(&option_id).cloned());

                Ok(AnswerDetail {
                    question,
                    selected_option,
                    input_answer: answer_model.input_answer,
                    is_correct: answer_model.is_correct,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(AttemptDetail {
            attempt: map_attempt(attempt_model),
            assessment: map_assessment(assessment_model)?,
            answers,
        }))
    }

    async fn list_for_student(
        &self,
        student_id: StudentId,
        assessment_ids: &[AssessmentId],
    ) -> Result<Vec<AttemptRecord>> {
        if assessment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = attempt::Entity::find()
            .filter(attempt::Column::StudentId.eq(student_id.into_inner()))
            .filter(
                attempt::Column::AssessmentId
                    .is_in(assessment_ids.iter().copied().map(AssessmentId::into_inner)),
            )
            .order_by_asc(attempt::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(map_attempt).collect())
    }

    async fn update_score(&self, attempt_id: AttemptId, score: i32) -> Result<ScoreUpdate> {
        let Some(attempt_model) = attempt::Entity::find_by_id(attempt_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(ScoreUpdate::NotFound);
        };

        let assessment_model = assessment::Entity::find_by_id(attempt_model.assessment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                anyhow!("assessment {} missing for attempt {}", attempt_model.assessment_id, attempt_model.id)
            })?;

        if score > assessment_model.total_points {
            return Ok(ScoreUpdate::ExceedsTotal { total_points: assessment_model.total_points });
        }

        let mut active: attempt::ActiveModel = attempt_model.into();
        active.score = Set(score);
        let updated = active.update(&self.db).await?;

        Ok(ScoreUpdate::Updated(map_attempt(updated)))
    }
}
