//! Phone number canonicalization for the gateway's `00`-prefixed
//! international format.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::validation::ValidationError;

/// Canonical form required by the gateway: `00`, then 7 to 15 digits
/// (country code + national number).
static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^00\d{7,15}$").expect("valid phone pattern"));

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number in the gateway's canonical international form.
///
/// Invariant: matches `^00\d{7,15}$`. Construct via [`PhoneNumber::normalize`].
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Query parameter name used by the gateway (`to`).
    pub const FIELD: &'static str = "to";

    /// Normalize an arbitrary input into the canonical `00`-prefixed form.
    ///
    /// Accepted shapes, dispatched on prefix after separator stripping:
    /// - `+<cc><national>` — the `+` becomes `00`,
    /// - `00<cc><national>` — already canonical, kept as-is,
    /// - `0<national>` — the leading `0` becomes `00<default_country_code>`,
    /// - `<cc><national>` — `00` is prepended.
    ///
    /// Fails with [`ValidationError::InvalidPhoneNumber`] (carrying the
    /// original input) when the result does not match the canonical pattern.
    pub fn normalize(
        input: impl AsRef<str>,
        default_country_code: &str,
    ) -> Result<Self, ValidationError> {
        let original = input.as_ref();
        let stripped: String = original
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')' | '[' | ']'))
            .collect();

        let candidate = if let Some(rest) = stripped.strip_prefix('+') {
            format!("00{rest}")
        } else if stripped.starts_with("00") {
            stripped
        } else if let Some(rest) = stripped.strip_prefix('0') {
            format!("00{default_country_code}{rest}")
        } else {
            format!("00{stripped}")
        };

        if !CANONICAL.is_match(&candidate) {
            return Err(ValidationError::InvalidPhoneNumber {
                input: original.trim().to_owned(),
            });
        }
        Ok(Self(candidate))
    }

    /// Normalize a comma-separated list, preserving order.
    ///
    /// Each element is trimmed before normalization. All-or-nothing: the
    /// first invalid element fails the whole call.
    pub fn normalize_many(
        input: impl AsRef<str>,
        default_country_code: &str,
    ) -> Result<Vec<Self>, ValidationError> {
        Self::normalize_all(input.as_ref().split(','), default_country_code)
    }

    /// Normalize an already-split sequence, preserving order, all-or-nothing.
    pub fn normalize_all<I, S>(
        inputs: I,
        default_country_code: &str,
    ) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs
            .into_iter()
            .map(|raw| Self::normalize(raw.as_ref().trim(), default_country_code))
            .collect()
    }

    /// Borrow the canonical number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_number_gets_default_country_code() {
        let pn = PhoneNumber::normalize("0601020304", "33").unwrap();
        assert_eq!(pn.as_str(), "0033601020304");
    }

    #[test]
    fn plus_prefix_becomes_double_zero() {
        let pn = PhoneNumber::normalize("+33601020304", "33").unwrap();
        assert_eq!(pn.as_str(), "0033601020304");
    }

    #[test]
    fn canonical_input_is_unchanged() {
        let pn = PhoneNumber::normalize("0033601020304", "33").unwrap();
        assert_eq!(pn.as_str(), "0033601020304");
    }

    #[test]
    fn bare_country_code_is_prefixed() {
        let pn = PhoneNumber::normalize("33601020304", "33").unwrap();
        assert_eq!(pn.as_str(), "0033601020304");
    }

    #[test]
    fn separators_are_stripped() {
        let pn = PhoneNumber::normalize("06 01.02-03(04)", "33").unwrap();
        assert_eq!(pn.as_str(), "0033601020304");

        let pn = PhoneNumber::normalize("+33 [6] 01 02 03 04", "33").unwrap();
        assert_eq!(pn.as_str(), "0033601020304");
    }

    #[test]
    fn invalid_input_carries_the_original() {
        let err = PhoneNumber::normalize("abc123def", "33").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPhoneNumber {
                input: "abc123def".to_owned()
            }
        );
    }

    #[test]
    fn length_bounds_are_enforced() {
        // 6 digits after 00 is too short, 16 too long.
        assert!(PhoneNumber::normalize("00123456", "33").is_err());
        assert!(PhoneNumber::normalize("001234567", "33").is_ok());
        assert!(PhoneNumber::normalize("00123456789012345", "33").is_ok());
        assert!(PhoneNumber::normalize("001234567890123456", "33").is_err());
    }

    #[test]
    fn normalize_many_splits_trims_and_preserves_order() {
        let numbers = PhoneNumber::normalize_many("0601020304, 0602030405", "33").unwrap();
        let numbers: Vec<&str> = numbers.iter().map(PhoneNumber::as_str).collect();
        assert_eq!(numbers, vec!["0033601020304", "0033602030405"]);
    }

    #[test]
    fn normalize_many_is_all_or_nothing() {
        let err = PhoneNumber::normalize_many("0601020304, nope", "33").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhoneNumber { .. }));
    }

    #[test]
    fn normalize_all_accepts_pre_split_input() {
        let numbers =
            PhoneNumber::normalize_all(["+33601020304", "0602030405"], "33").unwrap();
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[1].as_str(), "0033602030405");
    }
}
