//! Session configuration: which account, which endpoint, which wire format.
//!
//! # Design
//! A `Session` is passed explicitly into every client instead of living in
//! global state, so several accounts can be driven side by side. It is
//! immutable once built; the `with_*` setters consume and return it.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ApiError, Result};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// REST API version every resource path is rooted at.
pub const DEFAULT_API_VERSION: &str = "2010-04-01";

/// Response representation requested from the server.
///
/// `Xml` is the API's native format and wraps every record in a
/// `<TwilioResponse>` envelope. `Json` is selected by a `.json` suffix on the
/// resource path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// Suffix appended to the last path segment.
    pub fn extension(self) -> &'static str {
        match self {
            ResponseFormat::Json => ".json",
            ResponseFormat::Xml => "",
        }
    }

    /// Value for the `accept` header.
    pub fn media_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Xml => "application/xml",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            other => Err(ApiError::Config(format!("unknown response format: {other}"))),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Json => f.write_str("json"),
            ResponseFormat::Xml => f.write_str("xml"),
        }
    }
}

/// Account-scoped settings shared by every request of a client.
#[derive(Debug, Clone)]
pub struct Session {
    account_sid: String,
    auth_token: Option<SecretString>,
    base_url: String,
    api_version: String,
    format: ResponseFormat,
}

impl Session {
    pub fn new(account_sid: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            format: ResponseFormat::default(),
        }
    }

    /// Load a session from the environment.
    ///
    /// Reads:
    /// - `TWILIO_ACCOUNT_SID` (required)
    /// - `TWILIO_AUTH_TOKEN`
    /// - `TWILIO_BASE_URL`
    /// - `TWILIO_RESPONSE_FORMAT` (`json` or `xml`)
    pub fn from_env() -> Result<Self> {
        use std::env;

        let account_sid = env::var("TWILIO_ACCOUNT_SID")
            .ok()
            .filter(|sid| !sid.trim().is_empty())
            .ok_or_else(|| ApiError::Config("TWILIO_ACCOUNT_SID is not set".to_string()))?;

        let mut session = Self::new(account_sid);

        if let Ok(token) = env::var("TWILIO_AUTH_TOKEN") {
            session = session.with_auth_token(token);
        }
        if let Ok(base_url) = env::var("TWILIO_BASE_URL") {
            session = session.with_base_url(&base_url);
        }
        if let Ok(format) = env::var("TWILIO_RESPONSE_FORMAT") {
            session = session.with_format(format.parse()?);
        }

        Ok(session)
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::new(auth_token.into().into_boxed_str()));
        self
    }

    /// Point the session at another host (a mock server, a proxy). Trailing
    /// slashes are dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    /// `authorization` header value, present only when a token is configured.
    pub(crate) fn authorization(&self) -> Option<String> {
        self.auth_token.as_ref().map(|token| {
            let credentials = format!("{}:{}", self.account_sid, token.expose_secret());
            format!("Basic {}", STANDARD.encode(credentials))
        })
    }
}
