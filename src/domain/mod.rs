//! Domain layer: strong types with validation and invariants (no I/O).

mod phone;
mod request;
pub mod segment;
mod validation;
mod value;

pub use phone::PhoneNumber;
pub use request::{DeliveryRequest, Message, SendOptions};
pub use segment::{Encoding, SegmentInfo, analyze};
pub use validation::ValidationError;
pub use value::{Account, Coding, Login, Password, Schedule, Sender, SmsClass, Tag};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_rejects_empty() {
        assert!(matches!(
            Account::new("   "),
            Err(ValidationError::Empty {
                field: Account::FIELD
            })
        ));
    }

    #[test]
    fn password_rejects_empty() {
        assert!(matches!(
            Password::new(""),
            Err(ValidationError::Empty {
                field: Password::FIELD
            })
        ));
    }

    #[test]
    fn normalization_round_trips_through_canonical_form() {
        for input in ["0601020304", "+33601020304", "0033601020304"] {
            let pn = PhoneNumber::normalize(input, "33").unwrap();
            assert_eq!(pn.as_str(), "0033601020304");
            // Idempotent on its own output.
            let again = PhoneNumber::normalize(pn.as_str(), "33").unwrap();
            assert_eq!(again, pn);
        }
    }

    #[test]
    fn gsm_only_text_keeps_gsm_encoding() {
        let info = analyze("Le rendez-vous est confirme a 18h", true);
        assert_eq!(info.encoding, Encoding::Gsm);
    }
}
