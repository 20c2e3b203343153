use super::{AttemptId, OptionId, QuestionId};

/// Free-text answers and stored answer keys are compared after trimming
/// surrounding whitespace and lowercasing.
pub fn normalize_free_text(input: &str) -> String {
    input.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectOption {
    pub id: OptionId,
    pub description: String,
}

/// Returns the first correct option whose normalized description equals the
/// normalized input. Storage order decides ties.
pub fn match_free_text(input: &str, correct_options: &[CorrectOption]) -> Option<OptionId> {
    let normalized = normalize_free_text(input);

    correct_options
        .iter()
        .find(|option| normalize_free_text(&option.description) == normalized)
        .map(|option| option.id)
}

/// What a learner actually supplied for one question. A selected option wins
/// over free text when both are present; empty free text counts as blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAnswer {
    Selection(OptionId),
    FreeText(String),
    Blank,
}

impl SubmittedAnswer {
    pub fn from_parts(selected_option_id: Option<OptionId>, input_answer: Option<&str>) -> Self {
        if let Some(option_id) = selected_option_id {
            return Self::Selection(option_id);
        }

        match input_answer {
            Some(text) if !text.is_empty() => Self::FreeText(text.to_string()),
            _ => Self::Blank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Graded {
        question_id: QuestionId,
        selected_option_id: Option<OptionId>,
        is_correct: bool,
        points_awarded: i32,
    },
    QuestionMissing {
        question_id: QuestionId,
    },
}

impl AnswerOutcome {
    pub fn points_awarded(&self) -> i32 {
        match self {
            Self::Graded { points_awarded, .. } => *points_awarded,
            Self::QuestionMissing { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub attempt_id: AttemptId,
    pub score: i32,
    pub outcomes: Vec<AnswerOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correct_options(descriptions: &[&str]) -> Vec<CorrectOption> {
        descriptions
            .iter()
            .enumerate()
            .map(|(index, description)| CorrectOption {
                id: OptionId::new(index as i32 + 1),
                description: description.to_string(),
            })
            .collect()
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_free_text("  PARIS  "), "paris");
        assert_eq!(normalize_free_text("Manila"), "manila");
        assert_eq!(normalize_free_text("   "), "");
    }

    #[test]
    fn free_text_matches_case_and_whitespace_insensitively() {
        let options = correct_options(&["Paris", "paris, France"]);

        let matched = match_free_text("  PARIS  ", &options);

        assert_eq!(matched, Some(OptionId::new(1)));
    }

    #[test]
    fn free_text_matches_later_option_when_first_differs() {
        let options = correct_options(&["Paris", "paris, France"]);

        let matched = match_free_text("PARIS, france", &options);

        assert_eq!(matched, Some(OptionId::new(2)));
    }

    #[test]
    fn first_of_equivalent_options_wins() {
        let options = correct_options(&["Manila", "  manila  "]);

        let matched = match_free_text("manila", &options);

        assert_eq!(matched, Some(OptionId::new(1)));
    }

    #[test]
    fn unmatched_free_text_yields_no_option() {
        let options = correct_options(&["Paris"]);

        assert_eq!(match_free_text("London", &options), None);
        assert_eq!(match_free_text("Paris", &[]), None);
    }

    #[test]
    fn selection_wins_over_free_text() {
        let answer = SubmittedAnswer::from_parts(Some(OptionId::new(7)), Some("Paris"));

        assert_eq!(answer, SubmittedAnswer::Selection(OptionId::new(7)));
    }

    #[test]
    fn empty_free_text_counts_as_blank() {
        assert_eq!(SubmittedAnswer::from_parts(None, Some("")), SubmittedAnswer::Blank);
        assert_eq!(SubmittedAnswer::from_parts(None, None), SubmittedAnswer::Blank);
    }

    #[test]
    fn whitespace_free_text_is_kept_verbatim() {
        let answer = SubmittedAnswer::from_parts(None, Some("  Paris "));

        assert_eq!(answer, SubmittedAnswer::FreeText("  Paris ".to_string()));
    }

    #[test]
    fn outcome_points_default_to_zero_for_missing_questions() {
        let outcome = AnswerOutcome::QuestionMissing {
            question_id: QuestionId::new(99),
        };

        assert_eq!(outcome.points_awarded(), 0);
    }
}
