use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::{debug, warn};

use crate::config::Config;
use crate::http::request::{Method, RequestLine, ResolvedPath};

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Reads one request from `reader` and returns the path to serve.
///
/// The request line is parsed and normalized, then every following header
/// line is consumed up to the blank line (or end of stream) and discarded.
/// This never fails: read errors are logged and the best path computed so
/// far is returned, which is the default document if nothing was read.
pub async fn read_request<R>(reader: &mut R, cfg: &Config) -> ResolvedPath
where
    R: AsyncBufRead + Unpin,
{
    let limit = cfg.read_timeout();

    let line = match read_line(reader, limit).await {
        Ok(Some(line)) => line,
        Ok(None) => {
            debug!("stream ended before a request line arrived");
            return normalize_path("", &cfg.default_document);
        }
        Err(e) => {
            warn!(error = %e, "failed to read request line");
            return normalize_path("", &cfg.default_document);
        }
    };

    debug!(line = %line, "request line");
    let request = parse_request_line(&line);
    if let Some(Method::Other(method)) = &request.method {
        debug!(method = %method, "unsupported method, serving default document");
    }

    let path = normalize_path(request.path_or_default(), &cfg.default_document);
    discard_headers(reader, limit).await;
    path
}

/// Splits a request line on whitespace. The path is only taken when the
/// first token is `GET` (any case) and a second token exists.
pub fn parse_request_line(line: &str) -> RequestLine {
    let mut tokens = line.split_whitespace();
    let method = tokens.next().map(Method::parse);
    let raw_path = match method {
        Some(Method::Get) => tokens.next().map(str::to_string),
        _ => None,
    };

    RequestLine { method, raw_path }
}

/// Turns a raw request target into a content-root-relative path.
///
/// Steps, in order: a trailing `/` gets the default document appended, all
/// leading `/` are stripped, a result of at most one character becomes the
/// default document, and `/` is translated to the host separator.
pub fn normalize_path(raw: &str, default_document: &str) -> ResolvedPath {
    let mut path = raw.to_string();
    if path.ends_with('/') {
        path.push_str(default_document);
    }

    let stripped = path.trim_start_matches('/');
    let path = if stripped.chars().count() <= 1 {
        default_document
    } else {
        stripped
    };

    ResolvedPath::new(path.replace('/', std::path::MAIN_SEPARATOR_STR))
}

async fn discard_headers<R>(reader: &mut R, limit: Option<Duration>)
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match read_line(reader, limit).await {
            Ok(Some(line)) if line.is_empty() => break,
            Ok(Some(line)) => debug!(header = %line, "ignoring header"),
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read request headers");
                break;
            }
        }
    }
}

/// Reads one `\n`-terminated line, stripping the line ending. `None` means
/// the stream was already at its end. Lines longer than [`MAX_LINE_LEN`]
/// are an `InvalidData` error.
async fn read_line<R>(reader: &mut R, limit: Option<Duration>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut bounded = (&mut *reader).take(MAX_LINE_LEN as u64);
    let n = match limit {
        Some(limit) => tokio::time::timeout(limit, bounded.read_until(b'\n', &mut buf))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "timed out waiting for request data"))??,
        None => bounded.read_until(b'\n', &mut buf).await?,
    };

    if n == 0 {
        return Ok(None);
    }
    if n == MAX_LINE_LEN && !buf.ends_with(b"\n") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {MAX_LINE_LEN} bytes"),
        ));
    }

    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
