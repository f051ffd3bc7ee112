use crate::domain::phone::PhoneNumber;
use crate::domain::segment::{self, SegmentInfo};
use crate::domain::validation::ValidationError;
use crate::domain::value::{Coding, Schedule, Sender, SmsClass, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message text to deliver (`message`).
///
/// Invariant: non-empty after trimming. The original value, including line
/// breaks and surrounding whitespace, is preserved.
pub struct Message {
    text: String,
    commercial: bool,
}

impl Message {
    /// Query parameter name used by the gateway (`message`).
    pub const FIELD: &'static str = "message";

    /// Create a non-commercial message.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_commercial(text, false)
    }

    /// Create a commercial message. The gateway appends the mandatory STOP
    /// clause, which the segment accounting charges to the first segment.
    pub fn commercial(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_commercial(text, true)
    }

    fn with_commercial(text: impl Into<String>, commercial: bool) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self { text, commercial })
    }

    /// Borrow the message text as provided.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this is commercial traffic.
    pub fn is_commercial(&self) -> bool {
        self.commercial
    }

    /// Segment accounting for this text under the given STOP-clause policy.
    pub fn analyze(&self, stop_clause: bool) -> SegmentInfo {
        segment::analyze(&self.text, stop_clause)
    }
}

#[derive(Debug, Clone, Default)]
/// Optional per-delivery settings.
pub struct SendOptions {
    /// Sender name; falls back to the configured default when absent.
    pub sender: Option<Sender>,
    /// Deferred delivery time.
    pub schedule: Option<Schedule>,
    /// Campaign tag.
    pub tag: Option<Tag>,
    /// SMS class 0..=3.
    pub class: Option<SmsClass>,
    /// Explicit coding override.
    pub coding: Option<Coding>,
    /// Suppress the STOP clause on commercial traffic.
    pub no_stop: bool,
    /// Reply-enabled mode: the gateway allocates a short number, so the
    /// sender name is forced empty.
    pub reply: bool,
}

#[derive(Debug, Clone)]
/// One delivery attempt: recipients, message, and options.
///
/// Validated at construction, immutable afterwards. Each attempt owns its
/// request exclusively; nothing here is shared or persisted.
pub struct DeliveryRequest {
    recipients: Vec<PhoneNumber>,
    message: Message,
    options: SendOptions,
}

impl DeliveryRequest {
    /// Build a request for one or more already-normalized recipients.
    pub fn new(
        recipients: Vec<PhoneNumber>,
        message: Message,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: PhoneNumber::FIELD,
            });
        }
        Ok(Self {
            recipients,
            message,
            options,
        })
    }

    /// Convenience constructor for a single recipient with default options.
    pub fn to_one(recipient: PhoneNumber, message: Message) -> Result<Self, ValidationError> {
        Self::new(vec![recipient], message, SendOptions::default())
    }

    /// The normalized recipients, in the order they were supplied.
    pub fn recipients(&self) -> &[PhoneNumber] {
        &self.recipients
    }

    /// The message to deliver.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The per-delivery options.
    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    /// Whether the STOP clause will be appended, i.e. whether commercial
    /// segment budgets apply.
    pub fn stop_clause_applies(&self) -> bool {
        self.message.is_commercial() && !self.options.no_stop
    }

    /// Segment accounting for this request.
    pub fn analyze(&self) -> SegmentInfo {
        self.message.analyze(self.stop_clause_applies())
    }
}
