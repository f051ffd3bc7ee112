//! Client configuration: an explicit, immutable value resolved once per
//! client, with environment-variable fallbacks under the `ALLMYSMS_` prefix.

use std::env;
use std::time::Duration;

use crate::client::SmsError;
use crate::client::hooks::Hooks;
use crate::domain::{Account, Login, Password, Sender};

/// Default send endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.allmysms.com/http/9.0/sendSms/";

/// Default country code applied to `0`-prefixed local numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "33";

/// Default response format requested from the gateway.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Default timeout applied to connection establishment and the full
/// response wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Environment variable prefix for [`SmsConfig::from_env`].
pub const ENV_PREFIX: &str = "ALLMYSMS";

#[derive(Debug, Clone)]
/// Effective configuration for a client.
///
/// Built once and treated as an immutable snapshot: concurrent sends read
/// from it without coordination. Also owns the lifecycle hook registry.
pub struct SmsConfig {
    pub(crate) account: Account,
    pub(crate) login: Login,
    pub(crate) password: Password,
    pub(crate) default_sender: Option<Sender>,
    pub(crate) default_country_code: String,
    pub(crate) default_content_type: String,
    pub(crate) timeout: Duration,
    pub(crate) raise_on_length_error: bool,
    pub(crate) api_endpoint: String,
    pub(crate) hooks: Hooks,
}

impl SmsConfig {
    /// Create a configuration from validated credentials and defaults.
    pub fn new(account: Account, login: Login, password: Password) -> Self {
        Self {
            account,
            login,
            password,
            default_sender: None,
            default_country_code: DEFAULT_COUNTRY_CODE.to_owned(),
            default_content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            raise_on_length_error: true,
            api_endpoint: DEFAULT_ENDPOINT.to_owned(),
            hooks: Hooks::default(),
        }
    }

    /// Load configuration from `ALLMYSMS_*` environment variables.
    ///
    /// `ALLMYSMS_ACCOUNT`, `ALLMYSMS_LOGIN`, and `ALLMYSMS_PASSWORD` are
    /// required; everything else falls back to the documented defaults.
    pub fn from_env() -> Result<Self, SmsError> {
        Self::from_env_with(|name| env::var(name).ok())
    }

    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SmsError> {
        let read = |name: &str| lookup(&env_key(name)).filter(|v| !v.is_empty());
        let require = |name: &str| {
            read(name).ok_or_else(|| SmsError::MissingCredential {
                variable: env_key(name),
            })
        };

        let mut config = Self::new(
            Account::new(require("ACCOUNT")?)?,
            Login::new(require("LOGIN")?)?,
            Password::new(require("PASSWORD")?)?,
        );

        if let Some(sender) = read("DEFAULT_SENDER") {
            config.default_sender = Some(Sender::new(sender)?);
        }
        if let Some(code) = read("DEFAULT_COUNTRY_CODE") {
            config.default_country_code = code;
        }
        if let Some(content_type) = read("DEFAULT_CONTENT_TYPE") {
            config.default_content_type = content_type;
        }
        if let Some(timeout) = read("TIMEOUT") {
            let seconds: u64 = timeout.trim().parse().map_err(|_| SmsError::Config {
                message: format!("{ENV_PREFIX}_TIMEOUT must be a number of seconds: {timeout}"),
            })?;
            config.timeout = Duration::from_secs(seconds);
        }
        if let Some(raise) = read("RAISE_ON_LENGTH_ERROR") {
            config.raise_on_length_error = !matches!(raise.trim(), "0" | "false" | "no" | "off");
        }
        if let Some(endpoint) = read("API_ENDPOINT") {
            config.api_endpoint = endpoint;
        }

        Ok(config)
    }

    /// Set the default sender name.
    pub fn default_sender(mut self, sender: Sender) -> Self {
        self.default_sender = Some(sender);
        self
    }

    /// Set the country code applied to `0`-prefixed local numbers.
    pub fn default_country_code(mut self, code: impl Into<String>) -> Self {
        self.default_country_code = code.into();
        self
    }

    /// Set the response format requested from the gateway.
    pub fn default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = content_type.into();
        self
    }

    /// Set the connection/response timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose whether over-length messages (more than
    /// [`crate::client::MAX_SEGMENTS`] segments) fail or only warn.
    pub fn raise_on_length_error(mut self, raise: bool) -> Self {
        self.raise_on_length_error = raise;
        self
    }

    /// Override the send endpoint URL.
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Mutable access to the lifecycle hook registry.
    pub fn hooks(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// The country code used by [`crate::domain::PhoneNumber::normalize`]
    /// for this configuration.
    pub fn country_code(&self) -> &str {
        &self.default_country_code
    }
}

fn env_key(name: &str) -> String {
    format!("{ENV_PREFIX}_{name}")
}
