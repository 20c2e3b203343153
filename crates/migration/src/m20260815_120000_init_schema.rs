use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lesson::Table)
                    .if_not_exists()
                    .col(pk_auto(Lesson::Id))
                    // Courses live in an external catalog; only the id is kept.
                    .col(integer(Lesson::CourseId))
                    .col(string_len(Lesson::Title, 200))
                    .col(text_null(Lesson::Description))
                    .col(integer(Lesson::OrderNo))
                    .col(boolean(Lesson::IsActive).default(false))
                    .col(timestamp(Lesson::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Lesson::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LessonContent::Table)
                    .if_not_exists()
                    .col(pk_auto(LessonContent::Id))
                    .col(integer(LessonContent::LessonId).unique_key())
                    .col(text_null(LessonContent::AttachmentLink1))
                    .col(text_null(LessonContent::AttachmentLink2))
                    .col(text_null(LessonContent::AttachmentLink3))
                    .col(text_null(LessonContent::AttachmentLink4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lesson_contents-lesson_id")
                            .from(LessonContent::Table, LessonContent::LessonId)
                            .to(Lesson::Table, Lesson::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assessment::Table)
                    .if_not_exists()
                    .col(pk_auto(Assessment::Id))
                    .col(integer(Assessment::CourseId))
                    .col(integer(Assessment::LessonId))
                    .col(string_len(Assessment::Title, 200))
                    .col(text_null(Assessment::Description))
                    .col(string_len(Assessment::AssessmentType, 50))
                    .col(
                        integer(Assessment::TotalPoints)
                            .default(0)
                            .check(Expr::col(Assessment::TotalPoints).gte(0)),
                    )
                    .col(integer(Assessment::TimeLimit).default(30))
                    .col(integer(Assessment::AttemptLimit).default(1))
                    .col(timestamp_null(Assessment::DateOpen))
                    .col(timestamp_null(Assessment::DateClose))
                    .col(timestamp(Assessment::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Assessment::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessments-lesson_id")
                            .from(Assessment::Table, Assessment::LessonId)
                            .to(Lesson::Table, Lesson::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(pk_auto(Question::Id))
                    .col(integer(Question::AssessmentId))
                    .col(text(Question::Question))
                    // QuestionType enum is represented in app code.
                    // 0=single_choice, 1=true_false, 2=identification, 3=essay
                    .col(
                        small_integer(Question::QuestionType)
                            .check(Expr::col(Question::QuestionType).gte(0))
                            .check(Expr::col(Question::QuestionType).lte(3)),
                    )
                    .col(integer(Question::Points).check(Expr::col(Question::Points).gte(0)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-questions-assessment_id")
                            .from(Question::Table, Question::AssessmentId)
                            .to(Assessment::Table, Assessment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionOption::Table)
                    .if_not_exists()
                    .col(pk_auto(QuestionOption::Id))
                    .col(integer(QuestionOption::QuestionId))
                    .col(text_null(QuestionOption::Description))
                    .col(boolean(QuestionOption::IsCorrect).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_options-question_id")
                            .from(QuestionOption::Table, QuestionOption::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attempt::Table)
                    .if_not_exists()
                    .col(pk_auto(Attempt::Id))
                    // Learner identity is owned by an external service.
                    .col(integer(Attempt::StudentId))
                    .col(integer(Attempt::AssessmentId))
                    .col(timestamp(Attempt::StartedAt).default(Expr::current_timestamp()))
                    .col(timestamp_null(Attempt::SubmittedAt))
                    .col(
                        integer(Attempt::Score)
                            .default(0)
                            .check(Expr::col(Attempt::Score).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attempts-assessment_id")
                            .from(Attempt::Table, Attempt::AssessmentId)
                            .to(Assessment::Table, Assessment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Answer::Table)
                    .if_not_exists()
                    .col(pk_auto(Answer::Id))
                    .col(integer(Answer::AttemptId))
                    .col(integer(Answer::QuestionId))
                    .col(integer_null(Answer::SelectedOptionId))
                    .col(boolean(Answer::IsCorrect).default(false))
                    .col(text_null(Answer::InputAnswer))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-answers-attempt_id")
                            .from(Answer::Table, Answer::AttemptId)
                            .to(Attempt::Table, Attempt::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-answers-question_id")
                            .from(Answer::Table, Answer::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // Options are deleted and recreated when an assessment is
                    // edited; stored answers must survive that.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-answers-selected_option_id")
                            .from(Answer::Table, Answer::SelectedOptionId)
                            .to(QuestionOption::Table, QuestionOption::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceTask::Table)
                    .if_not_exists()
                    .col(pk_auto(PerformanceTask::Id))
                    .col(integer(PerformanceTask::CourseId))
                    .col(string_len(PerformanceTask::Title, 200))
                    .col(
                        integer(PerformanceTask::TotalPoints)
                            .check(Expr::col(PerformanceTask::TotalPoints).gte(0)),
                    )
                    .col(timestamp(PerformanceTask::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceScore::Table)
                    .if_not_exists()
                    .col(pk_auto(PerformanceScore::Id))
                    .col(integer(PerformanceScore::StudentId))
                    .col(integer(PerformanceScore::PerformanceTaskId))
                    .col(
                        integer(PerformanceScore::Score)
                            .default(0)
                            .check(Expr::col(PerformanceScore::Score).gte(0)),
                    )
                    .col(timestamp(PerformanceScore::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(PerformanceScore::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-performance_scores-performance_task_id")
                            .from(
                                PerformanceScore::Table,
                                PerformanceScore::PerformanceTaskId,
                            )
                            .to(PerformanceTask::Table, PerformanceTask::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lessons_course_id")
                    .table(Lesson::Table)
                    .col(Lesson::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assessments_course_id")
                    .table(Assessment::Table)
                    .col(Assessment::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assessments_lesson_id")
                    .table(Assessment::Table)
                    .col(Assessment::LessonId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_assessment_id")
                    .table(Question::Table)
                    .col(Question::AssessmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_options_question_id")
                    .table(QuestionOption::Table)
                    .col(QuestionOption::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attempts_assessment_id")
                    .table(Attempt::Table)
                    .col(Attempt::AssessmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attempts_student_id_assessment_id")
                    .table(Attempt::Table)
                    .col(Attempt::StudentId)
                    .col(Attempt::AssessmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_answers_attempt_id")
                    .table(Answer::Table)
                    .col(Answer::AttemptId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_answers_question_id")
                    .table(Answer::Table)
                    .col(Answer::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_tasks_course_id")
                    .table(PerformanceTask::Table)
                    .col(PerformanceTask::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_scores_student_id")
                    .table(PerformanceScore::Table)
                    .col(PerformanceScore::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_scores_performance_task_id")
                    .table(PerformanceScore::Table)
                    .col(PerformanceScore::PerformanceTaskId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PerformanceScore::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PerformanceTask::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Answer::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Attempt::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QuestionOption::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assessment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LessonContent::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lesson::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Lesson {
    Table,
    Id,
    CourseId,
    Title,
    Description,
    OrderNo,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LessonContent {
    Table,
    Id,
    LessonId,
    #[sea_orm(iden = "attachment_link_1")]
    AttachmentLink1,
    #[sea_orm(iden = "attachment_link_2")]
    AttachmentLink2,
    #[sea_orm(iden = "attachment_link_3")]
    AttachmentLink3,
    #[sea_orm(iden = "attachment_link_4")]
    AttachmentLink4,
}

#[derive(DeriveIden)]
enum Assessment {
    Table,
    Id,
    CourseId,
    LessonId,
    Title,
    Description,
    AssessmentType,
    TotalPoints,
    TimeLimit,
    AttemptLimit,
    DateOpen,
    DateClose,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    AssessmentId,
    Question,
    QuestionType,
    Points,
}

#[derive(DeriveIden)]
enum QuestionOption {
    Table,
    Id,
    QuestionId,
    Description,
    IsCorrect,
}

#[derive(DeriveIden)]
enum Attempt {
    Table,
    Id,
    StudentId,
    AssessmentId,
    StartedAt,
    SubmittedAt,
    Score,
}

#[derive(DeriveIden)]
enum Answer {
    Table,
    Id,
    AttemptId,
    QuestionId,
    SelectedOptionId,
    IsCorrect,
    InputAnswer,
}

#[derive(DeriveIden)]
enum PerformanceTask {
    Table,
    Id,
    CourseId,
    Title,
    TotalPoints,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PerformanceScore {
    Table,
    Id,
    StudentId,
    PerformanceTaskId,
    Score,
    CreatedAt,
    UpdatedAt,
}
