use crate::entity::{lesson, lesson_content};
use anyhow::Result;
use aral_core::domain::{CourseId, LessonId};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

#[derive(Debug, Clone)]
pub struct LessonRecord {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub order_no: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct LessonContentRecord {
    pub id: i32,
    pub lesson_id: LessonId,
    pub attachment_link_1: Option<String>,
    pub attachment_link_2: Option<String>,
    pub attachment_link_3: Option<String>,
    pub attachment_link_4: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LessonWithContent {
    pub lesson: LessonRecord,
    pub content: Option<LessonContentRecord>,
}

#[derive(Debug, Clone)]
pub struct NewLesson {
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub order_no: i32,
    pub is_active: bool,
    pub attachment_links: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateLesson {
    pub title: String,
    pub description: Option<String>,
    pub order_no: i32,
    pub is_active: bool,
    pub attachment_links: Vec<String>,
}

#[derive(Debug)]
pub enum LessonCreate {
    Created(LessonRecord),
    OrderNoTaken,
}

#[derive(Debug)]
pub enum LessonUpdate {
    Updated(LessonRecord),
    OrderNoTaken,
    NotFound,
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn create(&self, new_lesson: NewLesson) -> Result<LessonCreate>;
    async fn find_with_content(&self, lesson_id: LessonId) -> Result<Option<LessonWithContent>>;
    async fn list_by_course(&self, course_id: CourseId) -> Result<Vec<LessonWithContent>>;
    async fn update(&self, lesson_id: LessonId, update: UpdateLesson) -> Result<LessonUpdate>;
    async fn delete(&self, lesson_id: LessonId) -> Result<bool>;
}

#[derive(Clone)]
pub struct SeaOrmLessonRepository {
    db: DatabaseConnection,
}

impl SeaOrmLessonRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_lesson(model: lesson::Model) -> LessonRecord {
        LessonRecord {
            id: LessonId::new(model.id),
            course_id: CourseId::new(model.course_id),
            title: model.title,
            description: model.description,
            order_no: model.order_no,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn map_content(model: lesson_content::Model) -> LessonContentRecord {
        LessonContentRecord {
            id: model.id,
            lesson_id: LessonId::new(model.lesson_id),
            attachment_link_1: model.attachment_link_1,
            attachment_link_2: model.attachment_link_2,
            attachment_link_3: model.attachment_link_3,
            attachment_link_4: model.attachment_link_4,
        }
    }

    // Empty strings in an attachment slot are stored as NULL.
    fn attachment_slot(links: &[String], index: usize) -> Option<String> {
        links.get(index).filter(|link| !link.is_empty()).cloned()
    }

    async fn order_no_conflict(
        &self,
        course_id: i32,
        order_no: i32,
        exclude_lesson: Option<i32>,
    ) -> Result<bool> {
        let mut query = lesson::Entity::find()
            .filter(lesson::Column::CourseId.eq(course_id))
            .filter(lesson::Column::OrderNo.eq(order_no));
        if let Some(lesson_id) = exclude_lesson {
            query = query.filter(lesson::Column::Id.ne(lesson_id));
        }

        Ok(query.one(&self.db).await?.is_some())
    }
}

#[async_trait]
impl LessonRepository for SeaOrmLessonRepository {
    async fn create(&self, new_lesson: NewLesson) -> Result<LessonCreate> {
        if self
            .order_no_conflict(new_lesson.course_id.into_inner(), new_lesson.order_no, None)
            .await?
        {
            return Ok(LessonCreate::OrderNoTaken);
        }

        let txn = self.db.begin().await?;

        let lesson_model = lesson::ActiveModel {
            course_id: Set(new_lesson.course_id.into_inner()),
            title: Set(new_lesson.title),
            description: Set(new_lesson.description),
            order_no: Set(new_lesson.order_no),
            is_active: Set(new_lesson.is_active),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        lesson_content::ActiveModel {
            lesson_id: Set(lesson_model.id),
            attachment_link_1: Set(Self::attachment_slot(&new_lesson.attachment_links, 0)),
            attachment_link_2: Set(Self::attachment_slot(&new_lesson.attachment_links, 1)),
            attachment_link_3: Set(Self::attachment_slot(&new_lesson.attachment_links, 2)),
            attachment_link_4: Set(Self::attachment_slot(&new_lesson.attachment_links, 3)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(LessonCreate::Created(Self::map_lesson(lesson_model)))
    }

    async fn find_with_content(&self, lesson_id: LessonId) -> Result<Option<LessonWithContent>> {
        let found = lesson::Entity::find_by_id(lesson_id.into_inner())
            .find_also_related(lesson_content::Entity)
            .one(&self.db)
            .await?;

        Ok(found.map(|(lesson_model, content_model)| LessonWithContent {
            lesson: Self::map_lesson(lesson_model),
            content: content_model.map(Self::map_content),
        }))
    }

    async fn list_by_course(&self, course_id: CourseId) -> Result<Vec<LessonWithContent>> {
        let rows = lesson::Entity::find()
            .filter(lesson::Column::CourseId.eq(course_id.into_inner()))
            .order_by_asc(lesson::Column::OrderNo)
            .find_also_related(lesson_content::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(lesson_model, content_model)| LessonWithContent {
                lesson: Self::map_lesson(lesson_model),
                content: content_model.map(Self::map_content),
            })
            .collect())
    }

    async fn update(&self, lesson_id: LessonId, update: UpdateLesson) -> Result<LessonUpdate> {
        let Some(existing) = lesson::Entity::find_by_id(lesson_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(LessonUpdate::NotFound);
        };

        if self
            .order_no_conflict(existing.course_id, update.order_no, Some(existing.id))
            .await?
        {
            return Ok(LessonUpdate::OrderNoTaken);
        }

        let txn = self.db.begin().await?;

        let mut active: lesson::ActiveModel = existing.into();
        active.title = Set(update.title);
        active.description = Set(update.description);
        active.order_no = Set(update.order_no);
        active.is_active = Set(update.is_active);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        let existing_content = lesson_content::Entity::find()
            .filter(lesson_content::Column::LessonId.eq(lesson_id.into_inner()))
            .one(&txn)
            .await?;

        match existing_content {
            Some(content_model) => {
                let mut content: lesson_content::ActiveModel = content_model.into();
                content.attachment_link_1 = Set(Self::attachment_slot(&update.attachment_links, 0));
                content.attachment_link_2 = Set(Self::attachment_slot(&update.attachment_links, 1));
                content.attachment_link_3 = Set(Self::attachment_slot(&update.attachment_links, 2));
                content.attachment_link_4 = Set(Self::attachment_slot(&update.attachment_links, 3));
                content.update(&txn).await?;
            }
            None => {
                lesson_content::ActiveModel {
                    lesson_id: Set(lesson_id.into_inner()),
                    attachment_link_1: Set(Self::attachment_slot(&update.attachment_links, 0)),
                    attachment_link_2: Set(Self::attachment_slot(&update.attachment_links, 1)),
                    attachment_link_3: Set(Self::attachment_slot(&update.attachment_links, 2)),
                    attachment_link_4: Set(Self::attachment_slot(&update.attachment_links, 3)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        Ok(LessonUpdate::Updated(Self::map_lesson(updated)))
    }

    async fn delete(&self, lesson_id: LessonId) -> Result<bool> {
        let result = lesson::Entity::delete_by_id(lesson_id.into_inner())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
