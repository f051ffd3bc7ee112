//! Typed Rust client for the AllMySMS HTTP GET gateway.
//!
//! The design follows three layers: a domain layer of strong types (segment
//! accounting, phone normalization, request values), a transport layer for
//! wire-format quirks (GET parameter encoding, four response formats), and a
//! small client layer orchestrating the single exchange.
//!
//! ```rust,no_run
//! use allmysms::{
//!     Account, DeliveryRequest, Login, Message, Password, PhoneNumber, SmsClient, SmsConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), allmysms::SmsError> {
//!     let config = SmsConfig::new(
//!         Account::new("ACC-1")?,
//!         Login::new("login")?,
//!         Password::new("password")?,
//!     );
//!     let client = SmsClient::new(config)?;
//!
//!     let to = PhoneNumber::normalize("0601020304", "33")?;
//!     let request = DeliveryRequest::to_one(to, Message::new("hello")?)?;
//!     let result = client.send(&request).await?;
//!     println!("credits left: {:?}", result.credits_remaining);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{Hooks, MAX_SEGMENTS, SmsClient, SmsConfig, SmsError};
pub use domain::{
    Account, Coding, DeliveryRequest, Encoding, Login, Message, Password, PhoneNumber, Schedule,
    SegmentInfo, SendOptions, Sender, SmsClass, Tag, ValidationError, analyze,
};
pub use transport::{DecodeError, DeliveryResult, ResponseFormat, decode_response};
