use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub total_points: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::performance_score::Entity")]
    PerformanceScore,
}

impl Related<super::performance_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceScore.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
