//! Request configuration and execution.
//!
//! [`RequestBuilder`] collects the pieces of a request through chained
//! setters. [`RequestBuilder::build`] resolves defaults and produces a
//! [`RequestSpec`], an immutable request that is executed exactly once.
//! The builder also offers shortcuts that build and execute in one step.

use crate::{client::Client, params::Params, task::Pending, Error, Reply, Result};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost:8000";
const DEFAULT_PATH: &str = "/";

/// Accumulates the configuration for a single HTTP request.
///
/// Every setter is infallible and returns the builder, so calls chain.
/// Invalid header names or values and unserializable JSON bodies are
/// remembered and reported when the request is built.
///
/// Unset fields resolve to `GET http://localhost:8000/`. A full URL set with
/// [`url`](Self::url) takes precedence over [`scheme`](Self::scheme),
/// [`host`](Self::host) and [`path`](Self::path).
///
/// Building consumes the builder. To reuse a slot, take the builder out with
/// [`std::mem::take`], which leaves a default builder behind.
///
/// # Examples
///
/// ```no_run
/// use easyreq::RequestBuilder;
///
/// # async fn example() -> Result<(), easyreq::Error> {
/// let reply = RequestBuilder::new()
///     .method("POST")
///     .host("example.com")
///     .path("/submit")
///     .form("name", "x")
///     .header("Content-Type", "application/x-www-form-urlencoded")
///     .fetch()
///     .await?;
///
/// println!("{} {}", reply.status, reply.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: String,
    url: String,
    scheme: String,
    host: String,
    path: String,
    body: Bytes,
    headers: HeaderMap,
    query: Params,
    form: Params,
    client: Option<Client>,
    cancellation: Option<CancellationToken>,
    timeout: Option<Duration>,
    error: Option<Error>,
}

impl RequestBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method. Defaults to `GET`.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the complete request URL, overriding scheme, host and path.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the URL scheme. Defaults to `http`.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the host, optionally with a port. Defaults to `localhost:8000`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the URL path. Defaults to `/`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the client the request is dispatched through.
    ///
    /// Without one, a client with default settings is built when the
    /// request executes.
    pub fn client(mut self, client: impl Into<Client>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Sets the raw request body. A non-empty body takes precedence over
    /// form data.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as JSON into the body and sets
    /// `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.body = body.into();
                self.headers.append(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
            }
            Err(e) => self.fail(Error::SerializationFailed(e.to_string())),
        }
        self
    }

    /// Attaches a token that cancels the request when triggered.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Sets a timeout for this request, from dispatch until the response
    /// body has been read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(key, value);
        self
    }

    /// Replaces all query parameters.
    pub fn queries(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    /// Appends a form field.
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.append(key, value);
        self
    }

    /// Replaces all form fields.
    pub fn forms(mut self, form: Params) -> Self {
        self.form = form;
        self
    }

    /// Appends a header value. Existing values under the same name are kept.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = match HeaderName::try_from(name.as_ref()) {
            Ok(name) => name,
            Err(e) => {
                self.fail(Error::InvalidHeader(format!("Invalid header name: {}", e)));
                return self;
            }
        };
        match HeaderValue::try_from(value.as_ref()) {
            Ok(value) => {
                self.headers.append(name, value);
            }
            Err(e) => self.fail(Error::InvalidHeader(format!("Invalid header value: {}", e))),
        }
        self
    }

    /// Replaces all headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends an `Authorization: Bearer` header.
    pub fn bearer_auth(self, token: impl std::fmt::Display) -> Self {
        let value = format!("Bearer {}", token);
        self.header(header::AUTHORIZATION.as_str(), value)
    }

    // Only the first setter error is reported.
    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// The URL string the request will target, before parsing.
    fn target(&self) -> String {
        let mut target = if self.url.is_empty() {
            let scheme = or_default(&self.scheme, DEFAULT_SCHEME);
            let host = or_default(&self.host, DEFAULT_HOST);
            let path = or_default(&self.path, DEFAULT_PATH);
            let slash = if path.starts_with('/') { "" } else { "/" };
            format!("{}://{}{}{}", scheme, host, slash, path)
        } else {
            self.url.clone()
        };

        // Appended as-is, even when the URL already carries a query.
        if !self.query.is_empty() {
            target.push('?');
            target.push_str(&self.query.encode());
        }
        target
    }

    /// Resolves defaults and produces the request to execute.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by a setter, or an error if the
    /// method or the resolved URL is invalid.
    pub fn build(mut self) -> Result<RequestSpec> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let method = if self.method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(self.method.as_bytes())
                .map_err(|_| Error::InvalidMethod(self.method.clone()))?
        };

        let url = Url::parse(&self.target())?;

        let payload = if !self.body.is_empty() {
            Some(self.body)
        } else if !self.form.is_empty() {
            Some(Bytes::from(self.form.encode()))
        } else {
            None
        };

        Ok(RequestSpec {
            method,
            url,
            headers: self.headers,
            payload,
            client: self.client,
            cancellation: self.cancellation,
            timeout: self.timeout,
        })
    }

    /// Builds and executes the request, returning the raw response.
    pub async fn send(self) -> Result<reqwest::Response> {
        self.build()?.execute().await
    }

    /// Builds and executes the request, reading the full body.
    pub async fn fetch(self) -> Result<Reply> {
        self.build()?.fetch().await
    }

    /// Builds and executes the request, then passes the outcome to
    /// `callback`.
    pub async fn send_with_status<F>(self, callback: F)
    where
        F: FnOnce(Result<Reply>),
    {
        callback(self.fetch().await)
    }

    /// Runs the request on a new Tokio task and passes the raw response to
    /// `callback` when it completes.
    ///
    /// Returns immediately. Build errors are delivered to the callback too.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(self, callback: F) -> Pending
    where
        F: FnOnce(Result<reqwest::Response>) + Send + 'static,
    {
        crate::task::spawn(self.build(), RequestSpec::execute, callback)
    }

    /// Runs the request on a new Tokio task and passes the status and body
    /// to `callback` when it completes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn_with_status<F>(self, callback: F) -> Pending
    where
        F: FnOnce(Result<Reply>) + Send + 'static,
    {
        crate::task::spawn(self.build(), RequestSpec::fetch, callback)
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// A resolved request, ready to execute once.
///
/// Produced by [`RequestBuilder::build`]. Every execution method takes
/// `self`, so a spec cannot be sent twice.
#[derive(Debug)]
pub struct RequestSpec {
    method: Method,
    url: Url,
    headers: HeaderMap,
    payload: Option<Bytes>,
    client: Option<Client>,
    pub(crate) cancellation: Option<CancellationToken>,
    timeout: Option<Duration>,
}

impl RequestSpec {
    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request payload, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the attached cancellation token.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Sends the request and returns the raw response.
    ///
    /// The body of the returned response has not been read yet.
    pub async fn execute(self) -> Result<reqwest::Response> {
        let token = self.cancellation.clone();
        cancellable(token.as_ref(), self.dispatch()).await
    }

    async fn dispatch(self) -> Result<reqwest::Response> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };

        let mut request = reqwest::Request::new(self.method, self.url);
        *request.headers_mut() = self.headers;
        *request.timeout_mut() = self.timeout;
        if let Some(payload) = self.payload {
            *request.body_mut() = Some(payload.into());
        }

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Executing HTTP request"
        );

        client.execute(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Request failed");
        })
    }

    /// Sends the request and reads the full response body.
    pub async fn fetch(self) -> Result<Reply> {
        let token = self.cancellation.clone();
        let start_time = Instant::now();

        let response = self.execute().await?;
        let status = response.status();
        let headers = response.headers().clone();

        let read = async { response.bytes().await.map_err(Error::from_body) };
        let body = cancellable(token.as_ref(), read).await.inspect_err(|e| {
            tracing::warn!(error = %e, status = status.as_u16(), "Failed to read response body");
        })?;

        let latency = start_time.elapsed();
        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        Ok(Reply::new(status, headers, body, latency))
    }

    /// Sends the request, then passes the outcome to `callback`.
    pub async fn execute_with_status<F>(self, callback: F)
    where
        F: FnOnce(Result<Reply>),
    {
        callback(self.fetch().await)
    }

    /// Runs [`execute`](Self::execute) on a new Tokio task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(self, callback: F) -> Pending
    where
        F: FnOnce(Result<reqwest::Response>) + Send + 'static,
    {
        crate::task::spawn(Ok(self), RequestSpec::execute, callback)
    }

    /// Runs [`fetch`](Self::fetch) on a new Tokio task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn_with_status<F>(self, callback: F) -> Pending
    where
        F: FnOnce(Result<Reply>) + Send + 'static,
    {
        crate::task::spawn(Ok(self), RequestSpec::fetch, callback)
    }
}

/// Races `fut` against `token`, if there is one.
async fn cancellable<T, Fut>(token: Option<&CancellationToken>, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    let Some(token) = token else {
        return fut.await;
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Request cancelled");
            Err(Error::Cancelled)
        }
        result = fut => result,
    }
}
