//! # easyreq - fluent, single-shot HTTP requests
//!
//! easyreq wraps `reqwest` in a chainable request builder. Configure the
//! method, URL pieces, headers, query string and body, then either await the
//! result or hand it off to a Tokio task with a completion callback.
//!
//! ## Quick Start
//!
//! ```no_run
//! use easyreq::RequestBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), easyreq::Error> {
//!     // GET http://localhost:8000/ unless told otherwise
//!     let reply = RequestBuilder::new()
//!         .host("api.example.com")
//!         .path("/search")
//!         .query("q", "rust")
//!         .query("page", "2")
//!         .header("Accept", "application/json")
//!         .fetch()
//!         .await?;
//!
//!     println!("{}: {}", reply.status, reply.text());
//!
//!     // POST a URL-encoded form
//!     let reply = RequestBuilder::new()
//!         .method("POST")
//!         .url("https://api.example.com/submit")
//!         .form("name", "x")
//!         .fetch()
//!         .await?;
//!     println!("Submitted in {:?}", reply.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Execution styles
//!
//! - [`RequestBuilder::send`] resolves to the raw [`reqwest::Response`].
//! - [`RequestBuilder::fetch`] also reads the body into a [`Reply`].
//! - [`RequestBuilder::send_with_status`] delivers the [`Reply`] to a callback.
//! - [`RequestBuilder::spawn`] and [`RequestBuilder::spawn_with_status`] run
//!   on a new task, invoke the callback from there, and return a [`Pending`]
//!   handle that can be awaited or cancelled.
//!
//! ## Clients and cancellation
//!
//! ```no_run
//! use easyreq::{Client, RequestBuilder};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), easyreq::Error> {
//! let client = Client::builder()
//!     .user_agent("my-app/1.0")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let token = CancellationToken::new();
//! let pending = RequestBuilder::new()
//!     .client(client.clone())
//!     .cancellation(token.clone())
//!     .url("https://api.example.com/report")
//!     .spawn_with_status(|result| println!("{:?}", result.map(|r| r.status)));
//!
//! token.cancel();
//! pending.join().await?;
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod client;
mod error;
mod params;
mod response;
mod task;

pub use builder::{RequestBuilder, RequestSpec};
pub use client::{Client, ClientBuilder, Transport};
pub use error::{Error, Result};
pub use params::Params;
pub use response::Reply;
pub use task::Pending;
