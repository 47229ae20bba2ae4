//! The HTTP transport a request is dispatched through.
//!
//! [`Client`] is a cheap-to-clone handle around any [`Transport`]. Inject one
//! with [`RequestBuilder::client`](crate::RequestBuilder::client); requests
//! without one fall back to a client built by [`ClientBuilder`] with default
//! settings at the moment they execute.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// A boxed future returned by [`Transport::execute`].
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Anything that can send a [`reqwest::Request`] and produce a response.
///
/// Implemented for [`reqwest::Client`]. Implement it yourself to route
/// requests through middleware or a test double.
///
/// # Examples
///
/// ```
/// use easyreq::{client::BoxFuture, Client, Transport};
///
/// struct Logged(reqwest::Client);
///
/// impl Transport for Logged {
///     fn execute(&self, request: reqwest::Request) -> BoxFuture<easyreq::Result<reqwest::Response>> {
///         println!("-> {} {}", request.method(), request.url());
///         Transport::execute(&self.0, request)
///     }
/// }
///
/// let client = Client::from_transport(Logged(reqwest::Client::new()));
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Sends `request` and resolves to the response head.
    fn execute(&self, request: reqwest::Request) -> BoxFuture<Result<reqwest::Response>>;
}

impl Transport for reqwest::Client {
    fn execute(&self, request: reqwest::Request) -> BoxFuture<Result<reqwest::Response>> {
        let pending = reqwest::Client::execute(self, request);
        Box::pin(async move { pending.await.map_err(Error::from_dispatch) })
    }
}

/// A shareable handle to a [`Transport`].
///
/// Cloning is cheap; all clones dispatch through the same transport and
/// therefore share its connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<dyn Transport>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Wraps a custom transport.
    pub fn from_transport(transport: impl Transport) -> Self {
        Self {
            inner: Arc::new(transport),
        }
    }

    /// Dispatches a prepared request.
    pub fn execute(&self, request: reqwest::Request) -> BoxFuture<Result<reqwest::Response>> {
        self.inner.execute(request)
    }
}

impl From<reqwest::Client> for Client {
    fn from(client: reqwest::Client) -> Self {
        Self::from_transport(client)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// Builder for a reqwest-backed [`Client`].
///
/// # Examples
///
/// ```no_run
/// use easyreq::Client;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), easyreq::Error> {
/// let client = Client::builder()
///     .timeout(Duration::from_secs(30))
///     .user_agent("my-app/1.0")
///     .default_header("X-Team", "payments")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header sent with every request made through this client.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::InvalidHeader(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::InvalidHeader(format!("Invalid header value: {}", e)))?;
        self.default_headers.append(name, value);
        Ok(self)
    }

    /// Sets a timeout covering connect, send and body read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder().default_headers(self.default_headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let http_client = builder.build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client::from(http_client))
    }
}
