use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(i32);

impl Points {
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(DomainError::NegativePoints(value))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl Default for Points {
    fn default() -> Self {
        Self(0)
    }
}

impl TryFrom<i32> for Points {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Points> for i32 {
    fn from(value: Points) -> Self {
        value.value()
    }
}
