//! Error types for building and executing requests.
//!
//! Failures fall into three groups: the request could not be constructed,
//! the transport could not deliver it, or the response body could not be
//! read. Each variant carries whatever the underlying library reported and
//! nothing more.

use http::StatusCode;

/// The main error type for request construction and execution.
///
/// # Examples
///
/// ```no_run
/// use easyreq::{Error, RequestBuilder};
///
/// # async fn example() {
/// match RequestBuilder::new().url("http://example.com/").fetch().await {
///     Ok(reply) => println!("status {}", reply.status),
///     Err(e) if e.is_construction() => eprintln!("bad request: {}", e),
///     Err(Error::Cancelled) => eprintln!("cancelled"),
///     Err(e) => eprintln!("request failed: {}", e),
/// }
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP method is not a valid token.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// The resolved URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The fallback client could not be constructed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A network-level error occurred while dispatching the request
    /// (connection refused, DNS failure, protocol error, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request exceeded its configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request was cancelled through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Reading the response body failed.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Failed to deserialize a response body into the expected type.
    ///
    /// The raw body is preserved so it can be logged.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A spawned request task panicked or was aborted.
    #[error("Request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// Returns `true` if the request could not be constructed.
    ///
    /// ```
    /// use easyreq::Error;
    ///
    /// assert!(Error::InvalidMethod("GE T".into()).is_construction());
    /// assert!(!Error::Timeout.is_construction());
    /// ```
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Error::InvalidMethod(_)
                | Error::InvalidUrl(_)
                | Error::InvalidHeader(_)
                | Error::SerializationFailed(_)
                | Error::ConfigurationError(_)
        )
    }

    /// Returns `true` if the transport failed to deliver the request.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout | Error::Cancelled)
    }

    /// Returns `true` if the response body could not be read.
    pub fn is_body(&self) -> bool {
        matches!(self, Error::Body(_))
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(e) | Error::Body(e) => e.status(),
            _ => None,
        }
    }

    /// Maps a transport error, pulling timeouts out into [`Error::Timeout`].
    pub(crate) fn from_dispatch(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }

    /// Maps a body read error, pulling timeouts out into [`Error::Timeout`].
    pub(crate) fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Body(err)
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.is_construction());
        assert!(!err.is_dispatch());

        assert!(Error::Cancelled.is_dispatch());
        assert!(Error::Timeout.is_dispatch());
        assert!(!Error::Cancelled.is_body());
    }

    #[test]
    fn test_deserialization_status() {
        let err = Error::DeserializationFailed {
            raw_response: "oops".to_string(),
            serde_error: "expected value".to_string(),
            status: StatusCode::OK,
        };
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert!(err.to_string().contains("status 200"));
    }
}
