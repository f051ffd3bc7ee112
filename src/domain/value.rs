use std::fmt;

use chrono::NaiveDateTime;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account identifier.
///
/// Invariant: non-empty after trimming.
pub struct Account(String);

impl Account {
    /// Query parameter name used by the gateway (`account`).
    pub const FIELD: &'static str = "account";

    /// Create a validated [`Account`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated account id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account login.
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// Query parameter name used by the gateway (`login`).
    pub const FIELD: &'static str = "login";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Gateway account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
/// The `Debug` impl redacts the value.
pub struct Password(String);

impl Password {
    /// Query parameter name used by the gateway (`password`).
    pub const FIELD: &'static str = "password";

    /// Placeholder substituted for the password in logs and hook payloads.
    pub const REDACTED: &'static str = "********";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name shown to the recipient (`sender`).
///
/// Invariant: non-empty after trimming. The value must be enabled on your
/// gateway account.
pub struct Sender(String);

impl Sender {
    /// Query parameter name used by the gateway (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`Sender`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Free-form campaign tag attached to a delivery (`tag`).
///
/// Invariant: non-empty after trimming, at most [`Tag::MAX_LEN`] characters.
pub struct Tag(String);

impl Tag {
    /// Query parameter name used by the gateway (`tag`).
    pub const FIELD: &'static str = "tag";

    /// Maximum accepted tag length in characters.
    pub const MAX_LEN: usize = 50;

    /// Create a validated [`Tag`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValidationError::TagTooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// SMS class (`class`), 0 to 3. Class 0 is a flash message.
pub struct SmsClass(u8);

impl SmsClass {
    /// Query parameter name used by the gateway (`class`).
    pub const FIELD: &'static str = "class";

    /// Create a validated class value.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > 3 {
            return Err(ValidationError::ClassOutOfRange { actual: value });
        }
        Ok(Self(value))
    }

    /// Get the underlying class value.
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Explicit coding override (`coding`), bypassing encoding auto-detection.
pub enum Coding {
    /// Force the GSM 7-bit alphabet (wire value 1).
    SevenBit,
    /// Force UCS-2 (wire value 2).
    Ucs2,
}

impl Coding {
    /// Query parameter name used by the gateway (`coding`).
    pub const FIELD: &'static str = "coding";

    /// Create a coding override from its wire value (1 or 2).
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Self::SevenBit),
            2 => Ok(Self::Ucs2),
            other => Err(ValidationError::CodingOutOfRange { actual: other }),
        }
    }

    /// Wire value sent to the gateway.
    pub fn wire_value(self) -> u8 {
        match self {
            Self::SevenBit => 1,
            Self::Ucs2 => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Scheduled delivery time (`date`), serialized as `HHmmddMMyyyy`.
pub enum Schedule {
    /// A timestamp, formatted by the crate.
    At(NaiveDateTime),
    /// A pre-formatted `HHmmddMMyyyy` string, passed through verbatim.
    Raw(String),
}

impl Schedule {
    /// Query parameter name used by the gateway (`date`).
    pub const FIELD: &'static str = "date";

    /// Wrap an already formatted `HHmmddMMyyyy` value.
    ///
    /// Only the shape is checked (exactly 12 digits); the gateway validates
    /// the calendar fields.
    pub fn raw(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 12 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidScheduleFormat {
                input: value.clone(),
            });
        }
        Ok(Self::Raw(trimmed.to_owned()))
    }

    /// Wire form (`HHmmddMMyyyy`) sent to the gateway.
    pub fn wire_value(&self) -> String {
        match self {
            Self::At(when) => when.format("%H%M%d%m%Y").to_string(),
            Self::Raw(value) => value.clone(),
        }
    }
}
