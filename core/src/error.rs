//! Error types for the Twilio REST client.
//!
//! # Design
//! Validation failures (`MissingArgument`, `InvalidLength`) are raised by the
//! `build_*` methods before a request exists, so no I/O ever happens for a
//! malformed call. `NotFound` gets a dedicated variant because callers
//! frequently distinguish "the resource does not exist" from "the server
//! returned an unexpected status." All other non-2xx responses land in
//! `HttpError`, carrying the Twilio error code and message when the body
//! could be decoded as a `RestException`.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `TwilioClient` and the transports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required identifier was empty.
    #[error("missing required argument: {name}")]
    MissingArgument { name: &'static str },

    /// A text field exceeded its maximum length (in characters).
    #[error("{name} must be at most {max} characters, got {actual}")]
    InvalidLength {
        name: &'static str,
        max: usize,
        actual: usize,
    },

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        code: Option<u32>,
        message: Option<String>,
        body: String,
    },

    /// The request never produced a response (DNS, connect, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body did not match the expected record shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The session could not be assembled.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Twilio error code, when the server supplied one.
    pub fn code(&self) -> Option<u32> {
        match self {
            ApiError::HttpError { code, .. } => *code,
            _ => None,
        }
    }

    /// True for failures detected locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::MissingArgument { .. } | ApiError::InvalidLength { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(ApiError::MissingArgument { name: "Sid" }.is_validation());
        assert!(ApiError::InvalidLength {
            name: "FriendlyName",
            max: 64,
            actual: 65
        }
        .is_validation());
        assert!(!ApiError::NotFound.is_validation());
        assert!(!ApiError::Transport("refused".into()).is_validation());
    }

    #[test]
    fn http_error_exposes_code() {
        let err = ApiError::HttpError {
            status: 400,
            code: Some(21452),
            message: Some("No phone numbers found".into()),
            body: String::new(),
        };
        assert_eq!(err.code(), Some(21452));
        assert_eq!(ApiError::NotFound.code(), None);
    }

    #[test]
    fn display_messages() {
        let err = ApiError::InvalidLength {
            name: "FriendlyName",
            max: 64,
            actual: 70,
        };
        assert_eq!(
            err.to_string(),
            "FriendlyName must be at most 64 characters, got 70"
        );
        assert_eq!(
            ApiError::MissingArgument {
                name: "IncomingPhoneNumberSid"
            }
            .to_string(),
            "missing required argument: IncomingPhoneNumberSid"
        );
    }
}
