//! HTTP worker implementation.
//!
//! Each accepted connection is handled by one [`connection::Connection`]
//! that answers a single GET request and then closes.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine driving the stages below
//! - **`parser`**: Reads the request line, normalizes the path, discards headers
//! - **`request`**: Request line, method and resolved path types
//! - **`resolver`**: Maps the path to a file under the content root, with 404 fallback
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: Status codes and the fixed response header block
//! - **`substitute`**: Streaming `<cs371date>` / `<cs371server>` replacement
//! - **`writer`**: Writes the header block and streams the body
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Request line + headers
//!        └──────┬──────┘
//!               │ ResolvedPath
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Stat file, fall back to 404 document
//!        └──────┬───────────┘
//!               │ ServedResource + status
//!               ▼
//!        ┌──────────────────┐
//!        │     Writing      │ ← Header block, chunked body
//!        └──────┬───────────┘
//!               │ success or failure
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use webworker::config::Config;
//! use webworker::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Arc::new(Config::default());
//!     let listener = TcpListener::bind(&cfg.listen_addr).await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let cfg = cfg.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, cfg);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod substitute;
pub mod writer;
