//! A fully-read response.
//!
//! [`Reply`] is what the status-reporting execution paths hand back: the
//! status code and the complete body, plus the headers and round-trip time
//! that came with them.

use crate::{Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Status, headers and body of a completed request.
///
/// # Examples
///
/// ```no_run
/// use easyreq::RequestBuilder;
///
/// # async fn example() -> Result<(), easyreq::Error> {
/// let reply = RequestBuilder::new()
///     .url("https://api.example.com/users/1")
///     .fetch()
///     .await?;
///
/// println!("Status: {}", reply.status);
/// println!("Body: {}", reply.text());
/// println!("Request took {:?}", reply.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Reply {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The complete response body.
    pub body: Bytes,

    /// Time from dispatch until the body was fully read.
    pub latency: Duration,
}

impl Reply {
    /// Creates a new `Reply`.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, latency: Duration) -> Self {
        Self {
            status,
            headers,
            body,
            latency,
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    ///
    /// ```
    /// # use easyreq::Reply;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let reply = Reply::new(
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     "hello".into(),
    ///     Duration::ZERO,
    /// );
    /// assert_eq!(reply.text(), "hello");
    /// ```
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] with the raw body attached if
    /// the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::error!(
                error = %e,
                status = self.status.as_u16(),
                "Failed to deserialize response"
            );
            Error::DeserializationFailed {
                raw_response: self.text(),
                serde_error: e.to_string(),
                status: self.status,
            }
        })
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Splits the reply into its status code and body.
    pub fn into_parts(self) -> (StatusCode, Bytes) {
        (self.status, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde::Deserialize;

    fn reply(status: u16, body: &'static str) -> Reply {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Reply::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Bytes::from_static(body.as_bytes()),
            Duration::from_millis(5),
        )
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
    }

    #[test]
    fn test_json() {
        let user: User = reply(200, r#"{"id":7}"#).json().unwrap();
        assert_eq!(user, User { id: 7 });
    }

    #[test]
    fn test_json_failure_keeps_raw_body() {
        match reply(502, "<html>bad gateway</html>").json::<User>() {
            Err(Error::DeserializationFailed {
                raw_response,
                status,
                ..
            }) => {
                assert_eq!(raw_response, "<html>bad gateway</html>");
                assert_eq!(status, StatusCode::BAD_GATEWAY);
            }
            other => panic!("Expected DeserializationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_accessors() {
        let r = reply(404, "missing");
        assert!(!r.is_success());
        assert_eq!(r.header("content-type"), Some("application/json"));
        assert_eq!(r.header("x-nope"), None);

        let (status, body) = r.into_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"missing");
    }
}
