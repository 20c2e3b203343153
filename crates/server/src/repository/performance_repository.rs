use crate::entity::{performance_score, performance_task};
use anyhow::Result;
use aral_core::domain::{CourseId, PerformanceTaskId, StudentId};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

#[derive(Debug, Clone)]
pub struct PerformanceTaskRecord {
    pub id: PerformanceTaskId,
    pub course_id: CourseId,
    pub title: String,
    pub total_points: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct PerformanceScoreRecord {
    pub id: i32,
    pub student_id: StudentId,
    pub performance_task_id: PerformanceTaskId,
    pub score: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPerformanceTask {
    pub course_id: CourseId,
    pub title: String,
    pub total_points: i32,
}

#[derive(Debug)]
pub enum RecordedScore {
    Recorded(PerformanceScoreRecord),
    ExceedsTotal { total_points: i32 },
    TaskNotFound,
}

#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    async fn create_task(&self, new_task: NewPerformanceTask) -> Result<PerformanceTaskRecord>;
    async fn list_tasks_by_course(&self, course_id: CourseId) -> Result<Vec<PerformanceTaskRecord>>;
    async fn delete_task(&self, task_id: PerformanceTaskId) -> Result<bool>;
    async fn record_score(
        &self,
        student_id: StudentId,
        task_id: PerformanceTaskId,
        score: i32,
    ) -> Result<RecordedScore>;
    async fn scores_for_student(
        &self,
        student_id: StudentId,
        task_ids: &[PerformanceTaskId],
    ) -> Result<Vec<PerformanceScoreRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmPerformanceRepository {
    db: DatabaseConnection,
}

impl SeaOrmPerformanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_task(model: performance_task::Model) -> PerformanceTaskRecord {
        PerformanceTaskRecord {
            id: PerformanceTaskId::new(model.id),
            course_id: CourseId::new(model.course_id),
            title: model.title,
            total_points: model.total_points,
            created_at: model.created_at,
        }
    }

    fn map_score(model: performance_score::Model) -> PerformanceScoreRecord {
        PerformanceScoreRecord {
            id: model.id,
            student_id: StudentId::new(model.student_id),
            performance_task_id: PerformanceTaskId::new(model.performance_task_id),
            score: model.score,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl PerformanceRepository for SeaOrmPerformanceRepository {
    async fn create_task(&self, new_task: NewPerformanceTask) -> Result<PerformanceTaskRecord> {
        let model = performance_task::ActiveModel {
            course_id: Set(new_task.course_id.into_inner()),
            title: Set(new_task.title),
            total_points: Set(new_task.total_points),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Self::map_task(model))
    }

    async fn list_tasks_by_course(&self, course_id: CourseId) -> Result<Vec<PerformanceTaskRecord>> {
        let models = performance_task::Entity::find()
            .filter(performance_task::Column::CourseId.eq(course_id.into_inner()))
            .order_by_desc(performance_task::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::map_task).collect())
    }

    async fn delete_task(&self, task_id: PerformanceTaskId) -> Result<bool> {
        let result = performance_task::Entity::delete_by_id(task_id.into_inner())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn record_score(
        &self,
        student_id: StudentId,
        task_id: PerformanceTaskId,
        score: i32,
    ) -> Result<RecordedScore> {
        let Some(task_model) = performance_task::Entity::find_by_id(task_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(RecordedScore::TaskNotFound);
        };

        if score > task_model.total_points {
            return Ok(RecordedScore::ExceedsTotal { total_points: task_model.total_points });
        }

        // Recording replaces any previous score for this (student, task) pair.
        let txn = self.db.begin().await?;

        performance_score::Entity::delete_many()
            .filter(performance_score::Column::StudentId.eq(student_id.into_inner()))
            .filter(performance_score::Column::PerformanceTaskId.eq(task_id.into_inner()))
            .exec(&txn)
            .await?;

        let model = performance_score::ActiveModel {
            student_id: Set(student_id.into_inner()),
            performance_task_id: Set(task_id.into_inner()),
            score: Set(score),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(RecordedScore::Recorded(Self::map_score(model)))
    }

    async fn scores_for_student(
        &self,
        student_id: StudentId,
        task_ids: &[PerformanceTaskId],
    ) -> Result<Vec<PerformanceScoreRecord>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = performance_score::Entity::find()
            .filter(performance_score::Column::StudentId.eq(student_id.into_inner()))
            .filter(
                performance_score::Column::PerformanceTaskId
                    .is_in(task_ids.iter().copied().map(PerformanceTaskId::into_inner)),
            )
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::map_score).collect())
    }
}
