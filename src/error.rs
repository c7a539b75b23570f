//! Closed error taxonomy and the single failure-classification site.
//!
//! Every public operation funnels raw reqwest/serde failures through the
//! constructors below exactly once. No other module re-interprets raw
//! errors, and nothing is retried anywhere in this crate.

use reqwest::StatusCode;
use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Every failure a caller can observe.
#[derive(Debug, Error)]
pub enum Error {
    /// The server rejected the credentials (401/403).
    #[error("authentication rejected: {message}")]
    Authentication { message: String },

    /// Connectivity, timeout, or TLS failure before a usable response was
    /// obtained, or the transfer broke mid-body.
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// A response arrived but did not decode into the declared shape.
    #[error("invalid response shape: {message}")]
    InvalidResponseShape {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// Non-2xx status with a server-supplied error payload.
    #[error("server reported failure (status {status}): {message}")]
    ServerReported { status: u16, message: String },

    /// Anything not classified above, wrapping the cause for diagnostics.
    #[error("unclassified failure: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl Error {
    /// Classify a reqwest failure raised while sending a request or reading
    /// its body.
    pub(crate) fn classify_send(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            Error::Transport {
                message,
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Error::InvalidResponseShape {
                message,
                source: Some(Box::new(err)),
            }
        } else {
            Error::Unknown {
                message,
                source: Some(Box::new(err)),
            }
        }
    }

    /// Classify a non-2xx status together with whatever body the server sent.
    pub(crate) fn classify_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Error::Authentication { message }
        } else {
            Error::ServerReported {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Classify a body that failed to decode into the declared shape.
    pub(crate) fn classify_decode(err: serde_json::Error) -> Self {
        Error::InvalidResponseShape {
            message: "failed to decode response body".to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn serialization(err: serde_json::Error) -> Self {
        Error::Unknown {
            message: "failed to serialize request body".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Pull the human-readable message out of an error payload.
///
/// Understands the `{"error": {"message": "..."}}` shape; anything else is
/// surfaced as the raw body so the server's words are never lost.
fn server_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value
            .pointer("/error/message")
            .and_then(serde_json::Value::as_str)
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error payload".to_string()
    } else {
        trimmed.to_string()
    }
}
