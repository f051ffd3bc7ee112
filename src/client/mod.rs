//! Client layer: orchestrates one GET exchange and maps transport ↔ domain.

mod config;
mod hooks;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DeliveryRequest, Password, PhoneNumber, ValidationError};
use crate::transport::{
    DecodeError, DeliveryResult, decode_response, encode_send_params,
};

pub use config::{
    DEFAULT_CONTENT_TYPE, DEFAULT_COUNTRY_CODE, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, ENV_PREFIX,
    SmsConfig,
};
pub use hooks::Hooks;

/// Hard ceiling on concatenated segments per delivery.
pub const MAX_SEGMENTS: usize = 10;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    content_type: Option<String>,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a str,
        accept: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
        accept: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, accept)
                .send()
                .await?;
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse { content_type, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsClient`].
///
/// Validation and normalization failures surface before any network I/O;
/// mapped gateway statuses become their own variants; everything the
/// transport throws is wrapped in [`SmsError::Network`].
pub enum SmsError {
    /// A required credential is missing from the environment.
    #[error("missing credential: set {variable}")]
    MissingCredential { variable: String },

    /// Some other configuration value is unusable.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The message would span more than [`MAX_SEGMENTS`] segments.
    #[error("message too long: {segments} segments (max {max})")]
    MessageLength { segments: usize, max: usize },

    /// Gateway status 401: bad credentials or IP not authorized.
    #[error("authentication refused: {}", message.as_deref().unwrap_or("status 401"))]
    Authentication { message: Option<String> },

    /// Gateway status 201: a required parameter was missing.
    #[error("missing parameter: {}", message.as_deref().unwrap_or("status 201"))]
    MissingParameter { message: Option<String> },

    /// Gateway status 202: a parameter value was rejected.
    #[error("invalid parameter: {}", message.as_deref().unwrap_or("status 202"))]
    InvalidParameter { message: Option<String> },

    /// Gateway status 241: the sender name is not enabled on the account.
    #[error("sender not found: {}", message.as_deref().unwrap_or("status 241"))]
    SenderNotFound { message: Option<String> },

    /// HTTP client / transport failure (DNS, TLS, timeout, etc).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body could not be parsed under its declared format.
    #[error("response parse error: {0}")]
    ResponseParse(#[from] DecodeError),
}

#[derive(Clone)]
/// High-level gateway client.
///
/// Orchestrates parameter assembly (delegating segment accounting and
/// number formatting to the domain layer), one blocking GET exchange, and
/// response decoding. Stateless between calls: each send owns its own
/// request/result pair, so concurrent sends need no coordination.
pub struct SmsClient {
    config: SmsConfig,
    http: Arc<dyn HttpTransport>,
}

impl SmsClient {
    /// Create a client from a resolved configuration snapshot.
    ///
    /// The configured timeout applies to connection establishment and the
    /// full response wait.
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|err| SmsError::Network(Box::new(err)))?;

        Ok(Self {
            config,
            http: Arc::new(ReqwestTransport { client }),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SmsConfig {
        &self.config
    }

    /// Normalize a comma-separated recipient list with the configured
    /// default country code. Order-preserving, all-or-nothing.
    pub fn normalize_recipients(&self, input: &str) -> Result<Vec<PhoneNumber>, SmsError> {
        Ok(PhoneNumber::normalize_many(
            input,
            self.config.country_code(),
        )?)
    }

    /// Send one delivery request through the gateway.
    ///
    /// Errors:
    /// - [`SmsError::MessageLength`] when the text spans more than
    ///   [`MAX_SEGMENTS`] segments and length errors are enabled (otherwise
    ///   the send proceeds with a warning),
    /// - [`SmsError::Network`] for transport failures,
    /// - [`SmsError::ResponseParse`] when the body defies its content type,
    /// - [`SmsError::Authentication`] / [`SmsError::MissingParameter`] /
    ///   [`SmsError::InvalidParameter`] / [`SmsError::SenderNotFound`] for
    ///   the mapped gateway statuses.
    ///
    /// Unmapped failure statuses are not errors: the decoded result is
    /// returned with `success() == false` and the interpretation is left to
    /// the caller.
    pub async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryResult, SmsError> {
        let info = request.analyze();
        if info.segment_count > MAX_SEGMENTS {
            if self.config.raise_on_length_error {
                return Err(SmsError::MessageLength {
                    segments: info.segment_count,
                    max: MAX_SEGMENTS,
                });
            }
            warn!(
                segments = info.segment_count,
                max = MAX_SEGMENTS,
                "message exceeds the segment ceiling; sending anyway"
            );
        }

        let mut params = Vec::<(String, String)>::new();
        self.config.push_credential_params(&mut params);
        params.extend(encode_send_params(
            request,
            self.config.default_sender.as_ref(),
        ));

        let sanitized = sanitize_params(&params);
        debug!(
            endpoint = %self.config.api_endpoint,
            recipients = request.recipients().len(),
            segments = info.segment_count,
            encoding = info.encoding.as_str(),
            params = ?sanitized,
            "sending sms"
        );
        self.config.hooks.notify_before_send(&sanitized);

        let url = build_send_url(&self.config.api_endpoint, &params)?;
        let response = self
            .http
            .get(&url, &self.config.default_content_type)
            .await
            .map_err(SmsError::Network)?;

        let content_type = response
            .content_type
            .as_deref()
            .unwrap_or(&self.config.default_content_type);
        let result = decode_response(&response.body, Some(content_type))?;
        self.config.hooks.notify_after_decode(&result);

        if result.success() {
            info!(
                status = result.status_code,
                message_ids = result.message_ids.len(),
                "sms accepted"
            );
            self.config.hooks.notify_success(&result);
            return Ok(result);
        }

        self.config.hooks.notify_failure(&result);
        let message = result.error_message.clone();
        match result.status_code {
            401 => Err(SmsError::Authentication { message }),
            201 => Err(SmsError::MissingParameter { message }),
            202 => Err(SmsError::InvalidParameter { message }),
            241 => Err(SmsError::SenderNotFound { message }),
            _ => Ok(result),
        }
    }
}

impl SmsConfig {
    fn push_credential_params(&self, params: &mut Vec<(String, String)>) {
        use crate::domain::{Account, Login};
        params.push((Account::FIELD.to_owned(), self.account.as_str().to_owned()));
        params.push((Login::FIELD.to_owned(), self.login.as_str().to_owned()));
        params.push((Password::FIELD.to_owned(), self.password.as_str().to_owned()));
    }
}

/// Copy of the parameter set safe to log and hand to hooks.
fn sanitize_params(params: &[(String, String)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            if key == Password::FIELD {
                (key.clone(), Password::REDACTED.to_owned())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

/// Assemble the full GET URL.
///
/// The query serializer percent-encodes embedded line feeds as `%0A`; the
/// gateway instead wants the literal sequence `%0d` for message line breaks,
/// so those escapes are rewritten after encoding.
fn build_send_url(endpoint: &str, params: &[(String, String)]) -> Result<String, SmsError> {
    let url = url::Url::parse_with_params(endpoint, params).map_err(|err| SmsError::Config {
        message: format!("invalid endpoint {endpoint}: {err}"),
    })?;
    Ok(url.as_str().replace("%0A", "%0d"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{
        Account, DeliveryRequest, Login, Message, PhoneNumber, SendOptions, Sender,
    };

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_accept: Option<String>,
        response_content_type: Option<String>,
        response_body: String,
        fail: bool,
    }

    impl FakeTransport {
        fn new(content_type: Option<&str>, body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_accept: None,
                    response_content_type: content_type.map(str::to_owned),
                    response_body: body.into(),
                    fail: false,
                })),
            }
        }

        fn failing() -> Self {
            let transport = Self::new(None, "");
            transport.state.lock().unwrap().fail = true;
            transport
        }

        fn last_url(&self) -> Option<String> {
            self.state.lock().unwrap().last_url.clone()
        }

        fn last_accept(&self) -> Option<String> {
            self.state.lock().unwrap().last_accept.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn get<'a>(
            &'a self,
            url: &'a str,
            accept: &'a str,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (content_type, body, fail) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_accept = Some(accept.to_owned());
                    (
                        state.response_content_type.clone(),
                        state.response_body.clone(),
                        state.fail,
                    )
                };
                if fail {
                    return Err("connection refused".into());
                }
                Ok(HttpResponse { content_type, body })
            })
        }
    }

    fn test_config() -> SmsConfig {
        SmsConfig::new(
            Account::new("ACC").unwrap(),
            Login::new("user").unwrap(),
            Password::new("secret").unwrap(),
        )
        .api_endpoint("https://example.invalid/send")
    }

    fn make_client(config: SmsConfig, transport: FakeTransport) -> SmsClient {
        SmsClient {
            config,
            http: Arc::new(transport),
        }
    }

    fn simple_request() -> DeliveryRequest {
        DeliveryRequest::to_one(
            PhoneNumber::normalize("0601020304", "33").unwrap(),
            Message::new("hello").unwrap(),
        )
        .unwrap()
    }

    const OK_JSON: &str = r#"{"status":100,"creditLeft":"1987","SmsIds":["10867690"]}"#;

    #[tokio::test]
    async fn send_builds_url_with_credentials_and_recipients() {
        let transport = FakeTransport::new(Some("application/json"), OK_JSON);
        let client = make_client(test_config(), transport.clone());

        let result = client.send(&simple_request()).await.unwrap();
        assert!(result.success());
        assert_eq!(result.credits_remaining, Some(1987.0));
        assert_eq!(result.message_ids, vec!["10867690"]);

        let url = transport.last_url().unwrap();
        assert!(url.starts_with("https://example.invalid/send?"));
        assert!(url.contains("account=ACC"));
        assert!(url.contains("login=user"));
        assert!(url.contains("password=secret"));
        assert!(url.contains("to=0033601020304"));
        assert!(url.contains("message=hello"));
        assert_eq!(transport.last_accept().as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn line_breaks_travel_as_literal_percent_0d() {
        let transport = FakeTransport::new(Some("application/json"), OK_JSON);
        let client = make_client(test_config(), transport.clone());

        let request = DeliveryRequest::to_one(
            PhoneNumber::normalize("0601020304", "33").unwrap(),
            Message::new("line one\r\nline two").unwrap(),
        )
        .unwrap();
        client.send(&request).await.unwrap();

        let url = transport.last_url().unwrap();
        assert!(url.contains("line+one%0dline+two"), "got url: {url}");
        assert!(!url.contains("%0A"));
        assert!(!url.contains("%0D"));
    }

    #[tokio::test]
    async fn default_sender_is_applied_and_reply_mode_overrides_it() {
        let config = test_config().default_sender(Sender::new("MYBRAND").unwrap());
        let transport = FakeTransport::new(Some("application/json"), OK_JSON);
        let client = make_client(config.clone(), transport.clone());

        client.send(&simple_request()).await.unwrap();
        assert!(transport.last_url().unwrap().contains("sender=MYBRAND"));

        let transport = FakeTransport::new(Some("application/json"), OK_JSON);
        let client = make_client(config, transport.clone());
        let request = DeliveryRequest::new(
            vec![PhoneNumber::normalize("0601020304", "33").unwrap()],
            Message::new("hi").unwrap(),
            SendOptions {
                reply: true,
                ..Default::default()
            },
        )
        .unwrap();
        client.send(&request).await.unwrap();

        let url = transport.last_url().unwrap();
        assert!(url.contains("reply=1"));
        assert!(!url.contains("sender="));
    }

    #[tokio::test]
    async fn mapped_statuses_become_typed_errors() {
        let cases = [
            (401, "Authentication"),
            (201, "MissingParameter"),
            (202, "InvalidParameter"),
            (241, "SenderNotFound"),
        ];
        for (status, expected) in cases {
            let body = format!(r#"{{"status":{status},"message":"nope"}}"#);
            let transport = FakeTransport::new(Some("application/json"), body);
            let client = make_client(test_config(), transport);

            let err = client.send(&simple_request()).await.unwrap_err();
            let matched = match (&err, expected) {
                (SmsError::Authentication { message }, "Authentication")
                | (SmsError::MissingParameter { message }, "MissingParameter")
                | (SmsError::InvalidParameter { message }, "InvalidParameter")
                | (SmsError::SenderNotFound { message }, "SenderNotFound") => {
                    message.as_deref() == Some("nope")
                }
                _ => false,
            };
            assert!(matched, "status {status}: unexpected error {err:?}");
        }
    }

    #[tokio::test]
    async fn unmapped_failure_status_is_returned_not_raised() {
        let transport = FakeTransport::new(
            Some("application/json"),
            r#"{"status":999,"message":"strange"}"#,
        );
        let client = make_client(test_config(), transport);

        let result = client.send(&simple_request()).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.status_code, 999);
        assert_eq!(result.error_message.as_deref(), Some("strange"));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_network_error() {
        let client = make_client(test_config(), FakeTransport::failing());
        let err = client.send(&simple_request()).await.unwrap_err();
        assert!(matches!(err, SmsError::Network(_)));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let transport = FakeTransport::new(Some("application/json"), "not json");
        let client = make_client(test_config(), transport);
        let err = client.send(&simple_request()).await.unwrap_err();
        match err {
            SmsError::ResponseParse(decode) => {
                assert_eq!(decode.content_type, "application/json");
                assert_eq!(decode.body, "not json");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn decoding_falls_back_to_configured_content_type() {
        // No Content-Type header on the response; the configured preference
        // (plain text here) drives the decoder.
        let config = test_config().default_content_type("text/plain");
        let transport = FakeTransport::new(None, "OK\n1987\n123");
        let client = make_client(config, transport.clone());

        let result = client.send(&simple_request()).await.unwrap();
        assert!(result.success());
        assert_eq!(result.message_ids, vec!["123"]);
        assert_eq!(transport.last_accept().as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn over_long_message_raises_or_warns_by_configuration() {
        // 11 non-commercial GSM segments: 160 + 10*153 would be needed for
        // 160 + 9*153 + 1 characters.
        let text = "A".repeat(160 + 9 * 153 + 1);
        let request = DeliveryRequest::to_one(
            PhoneNumber::normalize("0601020304", "33").unwrap(),
            Message::new(text).unwrap(),
        )
        .unwrap();

        let client = make_client(
            test_config(),
            FakeTransport::new(Some("application/json"), OK_JSON),
        );
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(
            err,
            SmsError::MessageLength {
                segments: 11,
                max: MAX_SEGMENTS
            }
        ));

        let client = make_client(
            test_config().raise_on_length_error(false),
            FakeTransport::new(Some("application/json"), OK_JSON),
        );
        let result = client.send(&request).await.unwrap();
        assert!(result.success());
    }

    #[tokio::test]
    async fn normalize_recipients_uses_the_configured_country_code() {
        let config = test_config().default_country_code("32");
        let client = make_client(
            config,
            FakeTransport::new(Some("application/json"), OK_JSON),
        );

        let numbers = client
            .normalize_recipients("0601020304, +33601020304")
            .unwrap();
        assert_eq!(numbers[0].as_str(), "0032601020304");
        assert_eq!(numbers[1].as_str(), "0033601020304");

        let err = client.normalize_recipients("nope").unwrap_err();
        assert!(matches!(
            err,
            SmsError::Validation(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[tokio::test]
    async fn hooks_fire_in_order_with_sanitized_params() {
        let events = Arc::new(Mutex::new(Vec::<String>::new()));
        let mut config = test_config();
        {
            let events = Arc::clone(&events);
            config.hooks().before_send(move |params| {
                let password = params
                    .iter()
                    .find(|(k, _)| k == "password")
                    .map(|(_, v)| v.clone())
                    .unwrap();
                events.lock().unwrap().push(format!("before:{password}"));
            });
        }
        {
            let events = Arc::clone(&events);
            config
                .hooks()
                .after_decode(move |result| {
                    events
                        .lock()
                        .unwrap()
                        .push(format!("decoded:{}", result.status_code));
                });
        }
        {
            let events = Arc::clone(&events);
            config
                .hooks()
                .on_success(move |_| events.lock().unwrap().push("success".to_owned()));
        }

        let transport = FakeTransport::new(Some("application/json"), OK_JSON);
        let client = make_client(config, transport);
        client.send(&simple_request()).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["before:********", "decoded:100", "success"]
        );
    }

    #[tokio::test]
    async fn failure_hook_fires_for_mapped_and_unmapped_statuses() {
        let seen = Arc::new(Mutex::new(Vec::<i32>::new()));

        for body in [
            r#"{"status":401,"message":"nope"}"#,
            r#"{"status":999,"message":"odd"}"#,
        ] {
            let mut config = test_config();
            let seen = Arc::clone(&seen);
            config
                .hooks()
                .on_failure(move |result| seen.lock().unwrap().push(result.status_code));

            let transport = FakeTransport::new(Some("application/json"), body);
            let client = make_client(config, transport);
            let _ = client.send(&simple_request()).await;
        }

        assert_eq!(*seen.lock().unwrap(), vec![401, 999]);
    }
}
