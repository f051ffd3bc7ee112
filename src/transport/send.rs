//! GET parameter encoding for the send endpoint.

use tracing::warn;

use crate::domain::{
    Coding, DeliveryRequest, Message, PhoneNumber, Schedule, Sender, SmsClass, Tag,
};

/// Encode the request-specific query parameters, in gateway order.
///
/// `default_sender` is the configured fallback used when the request does not
/// carry its own. Reply-enabled mode takes precedence over both: the gateway
/// allocates a short number, so any explicit sender is dropped with a
/// warning and the reply flag is set instead.
pub fn encode_send_params(
    request: &DeliveryRequest,
    default_sender: Option<&Sender>,
) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    let options = request.options();

    let to = request
        .recipients()
        .iter()
        .map(PhoneNumber::as_str)
        .collect::<Vec<_>>()
        .join(",");
    params.push((PhoneNumber::FIELD.to_owned(), to));

    // Carriage returns are dropped here; the remaining line feeds are
    // rewritten to the vendor's literal `%0d` during URL assembly, after
    // percent-encoding, so they never reach the wire as newline bytes.
    params.push((
        Message::FIELD.to_owned(),
        request.message().text().replace('\r', ""),
    ));

    let sender = options.sender.as_ref().or(default_sender);
    if options.reply {
        if let Some(sender) = sender {
            warn!(
                sender = sender.as_str(),
                "reply mode forces an empty sender; explicit sender ignored"
            );
        }
        params.push(("reply".to_owned(), "1".to_owned()));
    } else if let Some(sender) = sender {
        params.push((Sender::FIELD.to_owned(), sender.as_str().to_owned()));
    }

    if let Some(schedule) = options.schedule.as_ref() {
        params.push((Schedule::FIELD.to_owned(), schedule.wire_value()));
    }
    if let Some(tag) = options.tag.as_ref() {
        params.push((Tag::FIELD.to_owned(), tag.as_str().to_owned()));
    }
    if let Some(class) = options.class {
        params.push((SmsClass::FIELD.to_owned(), class.value().to_string()));
    }
    if let Some(coding) = options.coding {
        params.push((Coding::FIELD.to_owned(), coding.wire_value().to_string()));
    }
    if options.no_stop {
        params.push(("nostop".to_owned(), "1".to_owned()));
    }

    params
}
