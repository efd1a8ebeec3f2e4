/// Violations of the rules an `Item` guarantees for its whole lifetime
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    EmptyTitle,
    TitleTooLong { actual: usize, max: usize },
    NonPositiveDuration(i32),
    NegativePrice(crate::domain::value_objects::Price),
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::EmptyTitle => write!(f, "Title cannot be empty."),
            InvariantViolation::TitleTooLong { actual, max } => {
                write!(
                    f,
                    "Title cannot be longer than {} characters (got {}).",
                    max, actual
                )
            }
            InvariantViolation::NonPositiveDuration(minutes) => {
                write!(f, "The duration must be greater than zero (got {}).", minutes)
            }
            InvariantViolation::NegativePrice(price) => {
                write!(f, "Price cannot be negative (got {}).", price)
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
