//! Basic example demonstrating awaited and spawned requests.
//!
//! This example shows how to:
//! - Make a GET request with query parameters and read the reply
//! - POST a URL-encoded form
//! - Spawn a request and receive the result through a callback
//!
//! Run with: `cargo run --example basic_call`

use easyreq::{Client, Error, RequestBuilder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("easyreq=debug,basic_call=info")
        .init();

    let client = Client::builder().user_agent("easyreq-demo/0.1").build()?;

    println!("=== GET Request Example ===");
    let reply = RequestBuilder::new()
        .client(client.clone())
        .scheme("https")
        .host("jsonplaceholder.typicode.com")
        .path("/posts")
        .query("userId", "1")
        .fetch()
        .await?;

    let posts: Vec<Post> = reply.json()?;
    println!("Fetched {} posts in {:?}", posts.len(), reply.latency);
    println!("Status code: {}", reply.status);
    println!();

    println!("=== Form POST Example ===");
    let reply = RequestBuilder::new()
        .client(client.clone())
        .method("POST")
        .url("https://httpbin.org/post")
        .form("name", "x")
        .form("tags", "a")
        .form("tags", "b")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .fetch()
        .await?;
    println!("Status: {}, {} bytes", reply.status, reply.body.len());
    println!();

    println!("=== Spawned Request Example ===");
    let pending = RequestBuilder::new()
        .client(client)
        .url("https://jsonplaceholder.typicode.com/posts/1")
        .spawn_with_status(|result| match result {
            Ok(reply) => println!("Callback got {} ({} bytes)", reply.status, reply.body.len()),
            Err(e) => eprintln!("Callback got error: {}", e),
        });
    println!("Request spawned, waiting for callback...");
    pending.join().await?;

    Ok(())
}
