use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub performance_task_id: i32,
    pub score: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::performance_task::Entity",
        from = "Column::PerformanceTaskId",
        to = "super::performance_task::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PerformanceTask,
}

impl Related<super::performance_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceTask.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
