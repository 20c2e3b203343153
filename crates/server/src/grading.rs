use anyhow::Result;
use aral_core::domain::{
    AnswerOutcome, AssessmentId, AttemptId, AttemptReport, CorrectOption, OptionId, QuestionId,
    StudentId, SubmittedAnswer, match_free_text,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::warn;

use crate::entity::{answer, attempt, question, question_option};

#[derive(Debug, Clone)]
pub struct AttemptSubmission {
    pub student_id: StudentId,
    pub assessment_id: AssessmentId,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
    pub input_answer: Option<String>,
}

/// Grades one submission and persists the attempt with its answers.
///
/// The whole write sequence runs in a single transaction: the attempt row,
/// every answer row and the final score land together or not at all.
#[async_trait]
pub trait AttemptGrader: Send + Sync {
    async fn grade_submission(&self, submission: AttemptSubmission) -> Result<AttemptReport>;
}

#[derive(Clone)]
pub struct SeaOrmAttemptGrader {
    db: DatabaseConnection,
}

impl SeaOrmAttemptGrader {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttemptGrader for SeaOrmAttemptGrader {
    async fn grade_submission(&self, submission: AttemptSubmission) -> Result<AttemptReport> {
        let txn = self.db.begin().await?;

        let attempt_model = attempt::ActiveModel {
            student_id: Set(submission.student_id.into_inner()),
            assessment_id: Set(submission.assessment_id.into_inner()),
            started_at: Set(Utc::now().naive_utc()),
            submitted_at: Set(None),
            score: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut score = 0;
        let mut outcomes = Vec::with_capacity(submission.answers.len());

        for answer_input in submission.answers {
            // Lookup is scoped to the submitted assessment. A question id
            // from another assessment is as unresolvable as a missing one.
            let Some(question_model) = question::Entity::find()
                .filter(question::Column::Id.eq(answer_input.question_id.into_inner()))
                .filter(
                    question::Column::AssessmentId.eq(submission.assessment_id.into_inner()),
                )
                .one(&txn)
                .await?
            else {
                warn!(
                    question_id = answer_input.question_id.into_inner(),
                    "skipping answer for unknown question"
                );
                outcomes.push(AnswerOutcome::QuestionMissing {
                    question_id: answer_input.question_id,
                });
                continue;
            };

            let submitted = SubmittedAnswer::from_parts(
                answer_input.selected_option_id,
                answer_input.input_answer.as_deref(),
            );

            let (is_correct, matched_option_id) = match submitted {
                SubmittedAnswer::Selection(option_id) => {
                    let option_model =
                        question_option::Entity::find_by_id(option_id.into_inner())
                            .one(&txn)
                            .await?;
                    match option_model {
                        Some(option_model) => {
                            (option_model.is_correct, Some(OptionId::new(option_model.id)))
                        }
                        None => (false, None),
                    }
                }
                SubmittedAnswer::FreeText(input) => {
                    let correct_options: Vec<CorrectOption> = question_option::Entity::find()
                        .filter(question_option::Column::QuestionId.eq(question_model.id))
                        .filter(question_option::Column::IsCorrect.eq(true))
                        .filter(question_option::Column::Description.is_not_null())
                        .order_by_asc(question_option::Column::Id)
                        .all(&txn)
                        .await?
                        .into_iter()
                        .filter_map(|option| {
                            option.description.map(|description| CorrectOption {
                                id: OptionId::new(option.id),
                                description,
                            })
                        })
                        .collect();

                    match match_free_text(&input, &correct_options) {
                        Some(option_id) => (true, Some(option_id)),
                        None => (false, None),
                    }
                }
                SubmittedAnswer::Blank => (false, None),
            };

            let points_awarded = if is_correct { question_model.points } else { 0 };
            score += points_awarded;

            answer::ActiveModel {
                attempt_id: Set(attempt_model.id),
                question_id: Set(question_model.id),
                selected_option_id: Set(matched_option_id.map(OptionId::into_inner)),
                is_correct: Set(is_correct),
                input_answer: Set(answer_input
                    .input_answer
                    .filter(|input| !input.is_empty())),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            outcomes.push(AnswerOutcome::Graded {
                question_id: QuestionId::new(question_model.id),
                selected_option_id: matched_option_id,
                is_correct,
                points_awarded,
            });
        }

        let attempt_id = AttemptId::new(attempt_model.id);
        let mut finalized: attempt::ActiveModel = attempt_model.into();
        finalized.submitted_at = Set(Some(Utc::now().naive_utc()));
        finalized.score = Set(score);
        finalized.update(&txn).await?;

        txn.commit().await?;

        Ok(AttemptReport { attempt_id, score, outcomes })
    }
}
