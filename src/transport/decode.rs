//! Response decoding: four wire formats, one result model.
//!
//! The gateway answers with JSON, XML, an HTML page, or bare text depending
//! on the account configuration and the endpoint's mood. All four converge
//! on [`DeliveryResult`]; success is derived solely from the status code.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static XML_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<status>\s*(.*?)\s*</status>").expect("valid regex"));
static XML_CREDIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<creditLeft>\s*(.*?)\s*</creditLeft>").expect("valid regex"));
static XML_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<message>\s*(.*?)\s*</message>").expect("valid regex"));
static XML_SMS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<smsId>\s*(.*?)\s*</smsId>").expect("valid regex"));
static HTML_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").expect("valid regex"));
static HTML_BR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?\s*>").expect("valid regex"));
// Quirk inherited from the gateway's text format: a bare 3-digit number at
// the start of the error text overrides the status from the first line.
static LEADING_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d{3})\s+(.*)$").expect("valid regex"));

/// Wire format of a response body, classified from the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Xml,
    Html,
    Text,
}

impl ResponseFormat {
    /// Classify a declared content type by case-insensitive substring match,
    /// checked in order: `json`, `xml`, `html`, anything else (or no content
    /// type at all) is plain text.
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return Self::Text;
        };
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains("json") {
            Self::Json
        } else if lowered.contains("xml") {
            Self::Xml
        } else if lowered.contains("html") {
            Self::Html
        } else {
            Self::Text
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("cannot parse {content_type} response: {reason}")]
/// The body could not be interpreted under the declared format.
pub struct DecodeError {
    /// Content type the response declared (or the fallback used).
    pub content_type: String,
    /// What went wrong.
    pub reason: String,
    /// The raw body, preserved for diagnostics.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Decoded outcome of one delivery exchange.
///
/// Constructed once by [`decode_response`]; immutable thereafter.
pub struct DeliveryResult {
    /// Gateway status code (100 and 101 are success).
    pub status_code: i32,
    /// Remaining account credits, when the gateway reported them.
    pub credits_remaining: Option<f64>,
    /// Message identifiers, in the order the gateway returned them.
    pub message_ids: Vec<String>,
    /// Error text reported by the gateway, if any.
    pub error_message: Option<String>,
    /// Raw response body, untouched.
    pub raw_body: String,
    /// Content type the response declared.
    pub declared_content_type: Option<String>,
}

impl DeliveryResult {
    /// `true` iff the gateway accepted the delivery (status 100 or 101).
    pub fn success(&self) -> bool {
        matches!(self.status_code, 100 | 101)
    }

    fn empty(body: &str, content_type: Option<&str>) -> Self {
        Self {
            status_code: 0,
            credits_remaining: None,
            message_ids: Vec::new(),
            error_message: Some("Empty response".to_owned()),
            raw_body: body.to_owned(),
            declared_content_type: content_type.map(str::to_owned),
        }
    }
}

/// Decode a raw response body under the declared content type.
///
/// A blank body yields the "Empty response" result under every format, so
/// callers see one consistent shape for dead replies.
pub fn decode_response(
    body: &str,
    declared_content_type: Option<&str>,
) -> Result<DeliveryResult, DecodeError> {
    if body.trim().is_empty() {
        return Ok(DeliveryResult::empty(body, declared_content_type));
    }

    match ResponseFormat::classify(declared_content_type) {
        ResponseFormat::Json => decode_json(body, declared_content_type),
        ResponseFormat::Xml => Ok(decode_xml(body, declared_content_type)),
        ResponseFormat::Html => Ok(decode_html(body, declared_content_type)),
        ResponseFormat::Text => Ok(decode_text(body, declared_content_type)),
    }
}

/// Lenient numeric parse: the gateway sends credits both as numbers and as
/// quoted strings, and sometimes not at all.
fn parse_credits(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn coerce_i32(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().map(|n| n as i32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_credits(s),
        _ => None,
    }
}

fn decode_json(body: &str, content_type: Option<&str>) -> Result<DeliveryResult, DecodeError> {
    let document: Value = serde_json::from_str(body).map_err(|err| DecodeError {
        content_type: content_type.unwrap_or("application/json").to_owned(),
        reason: err.to_string(),
        body: body.to_owned(),
    })?;

    let status_code = document.get("status").and_then(coerce_i32).unwrap_or(0);
    let credits_remaining = document.get("creditLeft").and_then(coerce_f64);
    let message_ids = document
        .get("SmsIds")
        .or_else(|| document.get("smsIds"))
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| match id {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    let error_message = document
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|m| !m.is_empty());

    Ok(DeliveryResult {
        status_code,
        credits_remaining,
        message_ids,
        error_message,
        raw_body: body.to_owned(),
        declared_content_type: content_type.map(str::to_owned),
    })
}

/// Tag-scoped extraction; a full XML parser is deliberately not used.
fn decode_xml(body: &str, content_type: Option<&str>) -> DeliveryResult {
    let capture = |re: &Regex| {
        re.captures(body)
            .map(|c| c[1].trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let status_code = capture(&XML_STATUS)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0);
    let credits_remaining = capture(&XML_CREDIT).and_then(|raw| parse_credits(&raw));
    let error_message = capture(&XML_MESSAGE);
    let message_ids = XML_SMS_ID
        .captures_iter(body)
        .map(|c| c[1].trim().to_owned())
        .filter(|id| !id.is_empty())
        .collect();

    DeliveryResult {
        status_code,
        credits_remaining,
        message_ids,
        error_message,
        raw_body: body.to_owned(),
        declared_content_type: content_type.map(str::to_owned),
    }
}

fn decode_html(body: &str, content_type: Option<&str>) -> DeliveryResult {
    let lines: Vec<String> = match HTML_BODY.captures(body) {
        Some(captures) => HTML_BR
            .split(&captures[1])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect(),
        // No <body> tag: nothing to interpret.
        None => Vec::new(),
    };
    decode_lines(&lines, body, content_type)
}

fn decode_text(body: &str, content_type: Option<&str>) -> DeliveryResult {
    let lines: Vec<String> = body
        .trim()
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_owned())
        .collect();
    decode_lines(&lines, body, content_type)
}

/// Shared line-based interpretation for the plain-text and HTML formats.
fn decode_lines(lines: &[String], body: &str, content_type: Option<&str>) -> DeliveryResult {
    let Some(first) = lines.first().map(|l| l.trim()) else {
        return DeliveryResult::empty(body, content_type);
    };

    if first.eq_ignore_ascii_case("OK") {
        let credits_remaining = lines.get(1).and_then(|line| parse_credits(line));
        let message_ids = lines
            .iter()
            .skip(2)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        return DeliveryResult {
            status_code: 100,
            credits_remaining,
            message_ids,
            error_message: None,
            raw_body: body.to_owned(),
            declared_content_type: content_type.map(str::to_owned),
        };
    }

    let mut status_code = if first.eq_ignore_ascii_case("KO") {
        0
    } else {
        first.parse().unwrap_or(0)
    };

    let joined = lines[1..].join("\n");
    let mut message = joined.trim().to_owned();
    let overridden = LEADING_STATUS.captures(&message).and_then(|captures| {
        let code: i32 = captures[1].parse().ok()?;
        Some((code, captures[2].trim().to_owned()))
    });
    if let Some((code, rest)) = overridden {
        status_code = code;
        message = rest;
    }
    if message.is_empty() {
        message = "Unknown error".to_owned();
    }

    DeliveryResult {
        status_code,
        credits_remaining: None,
        message_ids: Vec::new(),
        error_message: Some(message),
        raw_body: body.to_owned(),
        declared_content_type: content_type.map(str::to_owned),
    }
}
