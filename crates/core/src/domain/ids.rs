use std::fmt;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            pub fn new(value: i32) -> Self {
                Self(value)
            }

            pub fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.into_inner()
            }
        }
    };
}

define_id_type!(StudentId);
define_id_type!(CourseId);
define_id_type!(LessonId);
define_id_type!(AssessmentId);
define_id_type!(QuestionId);
define_id_type!(OptionId);
define_id_type!(AttemptId);
define_id_type!(PerformanceTaskId);

#[cfg(test)]
mod tests {
    use super::AssessmentId;

    #[test]
    fn assessment_id_roundtrips_through_i32() {
        let id = AssessmentId::new(42);

        assert_eq!(i32::from(id), 42);
        assert_eq!(AssessmentId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }
}
