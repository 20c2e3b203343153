use std::fmt;

use super::{Points, QuestionType};

pub fn score_display(score: i32, total_points: i32) -> String {
    format!("{score}/{total_points}")
}

pub fn attempt_display(attempt_count: u64, attempt_limit: i32) -> String {
    format!("{attempt_count}/{attempt_limit}")
}

/// Reported correctness of one stored answer. Essay answers are never
/// auto-graded, so they report as pending manual review instead of a
/// boolean verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerCorrectness {
    Correct,
    Incorrect,
    NotApplicable,
}

impl AnswerCorrectness {
    pub fn from_graded(question_type: QuestionType, is_correct: bool) -> Self {
        if question_type == QuestionType::Essay {
            Self::NotApplicable
        } else if is_correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for AnswerCorrectness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-answer score line. Essays show their full point value while the
/// manual review is pending; everything else shows earned over possible.
pub fn answer_score_display(question_type: QuestionType, is_correct: bool, points: Points) -> String {
    let points = points.value();

    if question_type == QuestionType::Essay {
        format!("{points}")
    } else {
        let earned = if is_correct { points } else { 0 };
        format!("{earned} / {points}")
    }
}
