use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    TagTooLong { max: usize, actual: usize },
    ClassOutOfRange { actual: u8 },
    CodingOutOfRange { actual: u8 },
    InvalidScheduleFormat { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::TagTooLong { max, actual } => {
                write!(f, "tag too long: {actual} characters (max {max})")
            }
            Self::ClassOutOfRange { actual } => {
                write!(f, "sms class out of range: {actual} (expected 0..=3)")
            }
            Self::CodingOutOfRange { actual } => {
                write!(f, "coding out of range: {actual} (expected 1 or 2)")
            }
            Self::InvalidScheduleFormat { input } => {
                write!(f, "invalid schedule format: {input} (expected HHmmddMMyyyy)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "to" };
        assert_eq!(err.to_string(), "to must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "abc".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: abc");

        let err = ValidationError::TagTooLong { max: 50, actual: 51 };
        assert_eq!(err.to_string(), "tag too long: 51 characters (max 50)");

        let err = ValidationError::ClassOutOfRange { actual: 4 };
        assert_eq!(err.to_string(), "sms class out of range: 4 (expected 0..=3)");

        let err = ValidationError::CodingOutOfRange { actual: 3 };
        assert_eq!(err.to_string(), "coding out of range: 3 (expected 1 or 2)");

        let err = ValidationError::InvalidScheduleFormat {
            input: "tomorrow".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid schedule format: tomorrow (expected HHmmddMMyyyy)"
        );
    }
}
