//! Transport layer: wire-format details (parameter encoding and response
//! decoding).

mod decode;
mod send;

pub use decode::{DecodeError, DeliveryResult, ResponseFormat, decode_response};
pub use send::encode_send_params;
