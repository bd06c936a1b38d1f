use std::fmt;

/// HTTP request methods.
///
/// Only GET is served; every other verb is kept verbatim so it can be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
    /// Anything else, as sent by the client
    Other(String),
}

impl Method {
    /// Parses an HTTP method, matching `GET` case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// # use webworker::http::request::Method;
    /// assert_eq!(Method::parse("get"), Method::Get);
    /// assert_eq!(Method::parse("POST"), Method::Other("POST".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("GET") {
            Method::Get
        } else {
            Method::Other(s.to_string())
        }
    }
}

/// The first line of a request, split into the parts the worker cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The method token, if the line had one
    pub method: Option<Method>,
    /// The request target; only set for GET requests
    pub raw_path: Option<String>,
}

impl RequestLine {
    /// The requested path, or `""` when absent (which normalizes to the
    /// default document).
    pub fn path_or_default(&self) -> &str {
        self.raw_path.as_deref().unwrap_or("")
    }
}

/// A normalized, content-root-relative path using the host separator.
///
/// Never starts with a separator and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath(String);

impl ResolvedPath {
    pub(crate) fn new(path: String) -> Self {
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
