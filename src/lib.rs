//! # textgen
//!
//! A small typed client for OpenAI-style text-completion endpoints.
//!
//! The client wraps the completion API behind three call shapes: a buffered
//! completion, a lazy token stream, and a diagnostic mode that renders any
//! request as a runnable `curl` command instead of sending it. Every failure
//! surfaces as one of the five [`Error`] kinds; callers never see raw
//! transport or decoding errors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textgen::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(std::env::var("TEXTGEN_API_KEY")?)?;
//!     let completion = client.complete("Write a haiku about the borrow checker").await?;
//!     println!("{}", completion.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use textgen::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(std::env::var("TEXTGEN_API_KEY")?)?;
//!     let mut stream = client.stream("Tell me a story");
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", chunk?.text);
//!     }
//!     Ok(())
//! }
//! ```

mod auth;

pub mod api;
pub mod client;
pub mod curl;
pub mod error;
pub mod http;
pub mod model;
pub mod stream;

pub use api::{Completion, CompletionRequest, TokenChunk, Usage};
pub use client::{Client, ClientConfig};
pub use curl::CurlOptions;
pub use error::Error;
pub use http::HttpConfig;
pub use model::{DEFAULT_MODEL, Model};
pub use stream::CompletionStream;
