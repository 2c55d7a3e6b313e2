//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; a `Transport` (or the caller) performs the actual
//! I/O. Parameters are kept as an ordered list of pairs rather than a
//! pre-encoded string so callers and tests can inspect exactly what will be
//! sent. Whether they travel in the query string or in a form body is decided
//! by the method.

/// HTTP method for a request. Twilio updates resources with POST, so there
/// is no PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `TwilioClient::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// Request parameters in the order they were added.
    pub params: Vec<(String, String)>,
    /// Element inside the XML envelope that holds the payload. `None` for
    /// requests whose response body is not decoded (delete).
    pub root_element: Option<String>,
}

impl HttpRequest {
    /// Value of the first parameter called `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Value of the header called `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Full target URL. GET and DELETE carry their parameters in the query
    /// string.
    pub fn url(&self) -> String {
        if self.method == HttpMethod::Post || self.params.is_empty() {
            return self.path.clone();
        }
        format!("{}?{}", self.path, encode_params(&self.params))
    }

    /// Form-encoded body. Only POST has one.
    pub fn body(&self) -> Option<String> {
        match self.method {
            HttpMethod::Post => Some(encode_params(&self.params)),
            HttpMethod::Get | HttpMethod::Delete => None,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn encode_params(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}
