use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    SingleChoice,
    TrueFalse,
    Identification,
    Essay,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::TrueFalse => "true_false",
            Self::Identification => "identification",
            Self::Essay => "essay",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_choice" => Ok(Self::SingleChoice),
            "true_false" => Ok(Self::TrueFalse),
            "identification" => Ok(Self::Identification),
            "essay" => Ok(Self::Essay),
            other => Err(DomainError::UnknownQuestionType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QuestionType;

    #[test]
    fn question_type_roundtrips_through_string() {
        for question_type in [
            QuestionType::SingleChoice,
            QuestionType::TrueFalse,
            QuestionType::Identification,
            QuestionType::Essay,
        ] {
            let parsed: QuestionType = question_type
                .as_str()
                .parse()
                .expect("known question type should parse");

            assert_eq!(parsed, question_type);
        }
    }

    #[test]
    fn unknown_question_type_is_rejected() {
        let err = "matching"
            .parse::<QuestionType>()
            .expect_err("unknown question type should be rejected");

        assert_eq!(err.to_string(), "unknown question type: matching");
    }
}
