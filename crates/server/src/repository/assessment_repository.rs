use std::collections::{HashMap, HashSet};

use crate::entity::{assessment, question, question_option};
use anyhow::{Context, Result};
use aral_core::domain::{AssessmentId, CourseId, LessonId, OptionId, Points, QuestionId, QuestionType};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

use super::{map_question_type, map_question_type_code};

#[derive(Debug, Clone)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub title: String,
    pub description: Option<String>,
    pub assessment_type: String,
    pub total_points: Points,
    pub time_limit: i32,
    pub attempt_limit: i32,
    pub date_open: Option<NaiveDateTime>,
    pub date_close: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub assessment_id: AssessmentId,
    pub question: String,
    pub question_type: QuestionType,
    pub points: Points,
}

#[derive(Debug, Clone)]
pub struct OptionRecord {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub description: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct QuestionWithOptions {
    pub question: QuestionRecord,
    pub options: Vec<OptionRecord>,
}

#[derive(Debug, Clone)]
pub struct AssessmentDetail {
    pub assessment: AssessmentRecord,
    pub questions: Vec<QuestionWithOptions>,
}

#[derive(Debug, Clone)]
pub struct CreatedAssessment {
    pub assessment: AssessmentRecord,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub title: String,
    pub description: Option<String>,
    pub assessment_type: String,
    pub total_points: Option<i32>,
    pub time_limit: Option<i32>,
    pub attempt_limit: Option<i32>,
    pub date_open: Option<NaiveDateTime>,
    pub date_close: Option<NaiveDateTime>,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub question_type: QuestionType,
    pub points: Option<i32>,
    pub options: Vec<NewOption>,
}

#[derive(Debug, Clone)]
pub struct NewOption {
    pub description: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct AssessmentUpdate {
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub title: String,
    pub description: Option<String>,
    pub assessment_type: String,
    pub total_points: Option<i32>,
    pub time_limit: Option<i32>,
    pub attempt_limit: Option<i32>,
    pub date_open: Option<NaiveDateTime>,
    pub date_close: Option<NaiveDateTime>,
    pub questions: Vec<QuestionUpdate>,
}

/// Question payload for an assessment update. A present id means the stored
/// question is retained and rewritten; an absent id means a new question.
#[derive(Debug, Clone)]
pub struct QuestionUpdate {
    pub id: Option<QuestionId>,
    pub question: String,
    pub question_type: QuestionType,
    pub points: Option<i32>,
    pub options: Vec<NewOption>,
}

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn create(&self, new_assessment: NewAssessment) -> Result<CreatedAssessment>;
    async fn find_detail(&self, assessment_id: AssessmentId) -> Result<Option<AssessmentDetail>>;
    async fn update(
        &self,
        assessment_id: AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Option<AssessmentRecord>>;
    async fn delete(&self, assessment_id: AssessmentId) -> Result<bool>;
    async fn list_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<AssessmentRecord>>;
    async fn list_by_course(&self, course_id: CourseId) -> Result<Vec<AssessmentRecord>>;
    async fn question_counts(
        &self,
        assessment_ids: &[AssessmentId],
    ) -> Result<HashMap<AssessmentId, u64>>;
}

#[derive(Clone)]
pub struct SeaOrmAssessmentRepository {
    db: DatabaseConnection,
}

pub(crate) fn map_assessment(model: assessment::Model) -> Result<AssessmentRecord> {
    Ok(AssessmentRecord {
        id: AssessmentId::new(model.id),
        course_id: CourseId::new(model.course_id),
        lesson_id: LessonId::new(model.lesson_id),
        title: model.title,
        description: model.description,
        assessment_type: model.assessment_type,
        total_points: Points::new(model.total_points).with_context(|| {
            format!("invalid assessment.total_points from database for id {}", model.id)
        })?,
        time_limit: model.time_limit,
        attempt_limit: model.attempt_limit,
        date_open: model.date_open,
        date_close: model.date_close,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub(crate) fn map_question(model: question::Model) -> Result<QuestionRecord> {
    Ok(QuestionRecord {
        id: QuestionId::new(model.id),
        assessment_id: AssessmentId::new(model.assessment_id),
        question: model.question,
        question_type: map_question_type(model.question_type)?,
        points: Points::new(model.points)
            .with_context(|| format!("invalid question.points from database for id {}", model.id))?,
    })
}

pub(crate) fn map_option(model: question_option::Model) -> OptionRecord {
    OptionRecord {
        id: OptionId::new(model.id),
        question_id: QuestionId::new(model.question_id),
        description: model.description,
        is_correct: model.is_correct,
    }
}

impl SeaOrmAssessmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn option_models(question_id: i32, options: Vec<NewOption>) -> Vec<question_option::ActiveModel> {
        options
            .into_iter()
            .map(|option| question_option::ActiveModel {
                question_id: Set(question_id),
                description: Set(option.description),
                is_correct: Set(option.is_correct),
                ..Default::default()
            })
            .collect()
    }

    fn question_point_sum(points: impl Iterator<Item = Option<i32>>) -> i32 {
        points.map(|value| value.unwrap_or(0)).sum()
    }
}

#[async_trait]
impl AssessmentRepository for SeaOrmAssessmentRepository {
    async fn create(&self, new_assessment: NewAssessment) -> Result<CreatedAssessment> {
        let point_sum = Self::question_point_sum(
            new_assessment.questions.iter().map(|question| question.points),
        );

        let txn = self.db.begin().await?;

        let assessment_model = assessment::ActiveModel {
            course_id: Set(new_assessment.course_id.into_inner()),
            lesson_id: Set(new_assessment.lesson_id.into_inner()),
            title: Set(new_assessment.title),
            description: Set(new_assessment.description),
            assessment_type: Set(new_assessment.assessment_type),
            total_points: Set(new_assessment.total_points.unwrap_or(point_sum)),
            time_limit: Set(new_assessment.time_limit.unwrap_or(30)),
            attempt_limit: Set(new_assessment.attempt_limit.unwrap_or(1)),
            date_open: Set(new_assessment.date_open),
            date_close: Set(new_assessment.date_close),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut question_models = Vec::with_capacity(new_assessment.questions.len());
        for new_question in new_assessment.questions {
            let question_model = question::ActiveModel {
                assessment_id: Set(assessment_model.id),
                question: Set(new_question.question),
                question_type: Set(map_question_type_code(new_question.question_type)),
                points: Set(new_question.points.unwrap_or(1)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            let option_models = Self::option_models(question_model.id, new_question.options);
            if !option_models.is_empty() {
                question_option::Entity::insert_many(option_models).exec(&txn).await?;
            }

            question_models.push(question_model);
        }

        txn.commit().await?;

        Ok(CreatedAssessment {
            assessment: map_assessment(assessment_model)?,
            questions: question_models
                .into_iter()
                .map(map_question)
                .collect::<Result<Vec<_>>>()?,
        })
    }

    async fn find_detail(&self, assessment_id: AssessmentId) -> Result<Option<AssessmentDetail>> {
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

        let mut options_by_question: HashMap<i32, Vec<OptionRecord>> = HashMap::new();
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
                    .push(map_option(option_model));
            }
        }

        let questions = question_models
            .into_iter()
            .map(|question_model| {
                let options = options_by_question
                    .remove(&question_model.id)
                    .unwrap_or_default();
                Ok(QuestionWithOptions {
                    question: map_question(question_model)?,
                    options,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(AssessmentDetail {
            assessment: map_assessment(assessment_model)?,
            questions,
        }))
    }

    async fn update(
        &self,
        assessment_id: AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Option<AssessmentRecord>> {
        let txn = self.db.begin().await?;

        let Some(existing) = assessment::Entity::find_by_id(assessment_id.into_inner())
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let point_sum =
            Self::question_point_sum(update.questions.iter().map(|question| question.points));

        let mut active: assessment::ActiveModel = existing.into();
        active.course_id = Set(update.course_id.into_inner());
        active.lesson_id = Set(update.lesson_id.into_inner());
        active.title = Set(update.title);
        active.description = Set(update.description);
        active.assessment_type = Set(update.assessment_type);
        active.total_points = Set(update.total_points.unwrap_or(point_sum));
        active.time_limit = Set(update.time_limit.unwrap_or(30));
        active.attempt_limit = Set(update.attempt_limit.unwrap_or(1));
        active.date_open = Set(update.date_open);
        active.date_close = Set(update.date_close);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        let existing_questions = question::Entity::find()
            .filter(question::Column::AssessmentId.eq(assessment_id.into_inner()))
            .all(&txn)
            .await?;

        let retained_ids: HashSet<i32> = update
            .questions
            .iter()
            .filter_map(|question| question.id.map(QuestionId::into_inner))
            .collect();

        let removed_ids: Vec<i32> = existing_questions
            .iter()
            .map(|question| question.id)
            .filter(|id| !retained_ids.contains(id))
            .collect();

        if !removed_ids.is_empty() {
            question_option::Entity::delete_many()
                .filter(question_option::Column::QuestionId.is_in(removed_ids.clone()))
                .exec(&txn)
                .await?;
            question::Entity::delete_many()
                .filter(question::Column::Id.is_in(removed_ids))
                .exec(&txn)
                .await?;
        }

        for question_update in update.questions {
            match question_update.id {
                Some(question_id) => {
                    question::ActiveModel {
                        id: Set(question_id.into_inner()),
                        question: Set(question_update.question),
                        question_type: Set(map_question_type_code(question_update.question_type)),
                        points: Set(question_update.points.unwrap_or(1)),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                    .with_context(|| {
                        format!("failed to update question {question_id} during assessment update")
                    })?;

                    question_option::Entity::delete_many()
                        .filter(question_option::Column::QuestionId.eq(question_id.into_inner()))
                        .exec(&txn)
                        .await?;

                    let option_models =
                        Self::option_models(question_id.into_inner(), question_update.options);
                    if !option_models.is_empty() {
                        question_option::Entity::insert_many(option_models).exec(&txn).await?;
                    }
                }
                None => {
                    let question_model = question::ActiveModel {
                        assessment_id: Set(assessment_id.into_inner()),
                        question: Set(question_update.question),
                        question_type: Set(map_question_type_code(question_update.question_type)),
                        points: Set(question_update.points.unwrap_or(1)),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;

                    let option_models =
                        Self::option_models(question_model.id, question_update.options);
                    if !option_models.is_empty() {
                        question_option::Entity::insert_many(option_models).exec(&txn).await?;
                    }
                }
            }
        }

        txn.commit().await?;

        map_assessment(updated).map(Some)
    }

    async fn delete(&self, assessment_id: AssessmentId) -> Result<bool> {
        let result = assessment::Entity::delete_by_id(assessment_id.into_inner())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<AssessmentRecord>> {
        let models = assessment::Entity::find()
            .filter(assessment::Column::LessonId.eq(lesson_id.into_inner()))
            .order_by_desc(assessment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(map_assessment).collect()
    }

    async fn list_by_course(&self, course_id: CourseId) -> Result<Vec<AssessmentRecord>> {
        let models = assessment::Entity::find()
            .filter(assessment::Column::CourseId.eq(course_id.into_inner()))
            .order_by_desc(assessment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(map_assessment).collect()
    }

    async fn question_counts(
        &self,
        assessment_ids: &[AssessmentId],
    ) -> Result<HashMap<AssessmentId, u64>> {
        if assessment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = question::Entity::find()
            .select_only()
            .column(question::Column::AssessmentId)
            .column_as(question::Column::Id.count(), "question_count")
            .filter(
                question::Column::AssessmentId
                    .is_in(assessment_ids.iter().copied().map(AssessmentId::into_inner)),
            )
            .group_by(question::Column::AssessmentId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(assessment_id, count)| (AssessmentId::new(assessment_id), count as u64))
            .collect())
    }
}
