//! Webworker - single-request static file worker
//!
//! Serves one GET request per connection from a content root, with
//! in-band date and server token substitution.

pub mod config;
pub mod http;
pub mod server;
