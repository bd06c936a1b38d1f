use std::time::SystemTime;

const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP status codes the worker can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 NOT FOUND
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webworker::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the reason phrase written on the status line.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "NOT FOUND",
        }
    }
}

/// Formats `time` as an RFC 7231 date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

/// The fixed header block sent before every body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub date: String,
    pub server: String,
    pub content_type: String,
}

impl ResponseHead {
    /// Serializes the status line, `Date`, `Server`, `Connection`, and
    /// `Content-Type` lines in that order, each ending in `\n`, followed by
    /// the blank separator line.
    pub fn serialize(&self) -> Vec<u8> {
        format!(
            "{} {} {}\nDate: {}\nServer: {}\nConnection: close\nContent-Type: {}\n\n",
            HTTP_VERSION,
            self.status.as_u16(),
            self.status.reason_phrase(),
            self.date,
            self.server,
            self.content_type,
        )
        .into_bytes()
    }
}
