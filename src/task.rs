//! Requests running on their own Tokio task.

use crate::{builder::RequestSpec, Result};
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a request started with one of the `spawn` methods.
///
/// The request's callback runs on the spawned task. The handle can cancel
/// the request or wait for the callback to finish; dropping it lets the
/// request run to completion unobserved.
///
/// # Examples
///
/// ```no_run
/// use easyreq::RequestBuilder;
///
/// # async fn example() -> Result<(), easyreq::Error> {
/// let pending = RequestBuilder::new()
///     .url("https://api.example.com/slow")
///     .spawn_with_status(|result| match result {
///         Ok(reply) => println!("{}: {} bytes", reply.status, reply.body.len()),
///         Err(e) => eprintln!("failed: {}", e),
///     });
///
/// // Changed our mind; the callback receives `Error::Cancelled`.
/// pending.cancel();
/// pending.join().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pending {
    handle: JoinHandle<()>,
    token: CancellationToken,
}

impl Pending {
    /// Cancels the request if it is still in flight.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the callback has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Returns the token that cancels this request.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Waits for the request and its callback to complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Join`](crate::Error::Join) if the callback panicked.
    pub async fn join(self) -> Result<()> {
        self.handle.await?;
        Ok(())
    }
}

/// Runs `run` on a new task and hands its outcome to `callback`.
///
/// The task's token is a child of the request's own token, so either one
/// cancels the request.
pub(crate) fn spawn<T, R, Fut, F>(spec: Result<RequestSpec>, run: R, callback: F) -> Pending
where
    T: Send + 'static,
    R: FnOnce(RequestSpec) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    F: FnOnce(Result<T>) + Send + 'static,
{
    let token = match &spec {
        Ok(RequestSpec {
            cancellation: Some(parent),
            ..
        }) => parent.child_token(),
        _ => CancellationToken::new(),
    };

    let spec = spec.map(|mut spec| {
        spec.cancellation = Some(token.clone());
        spec
    });

    let handle = tokio::spawn(async move {
        let result = match spec {
            Ok(spec) => run(spec).await,
            Err(e) => Err(e),
        };
        callback(result);
    });

    Pending { handle, token }
}
