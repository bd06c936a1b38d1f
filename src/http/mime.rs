//! MIME type detection based on file extensions.

use std::path::Path;

/// Served when the extension is missing or unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns the content type for `path`, judged by its extension alone.
///
/// # Example
///
/// ```
/// # use webworker::http::mime::content_type_for;
/// assert_eq!(content_type_for("home.html"), "text/html");
/// assert_eq!(content_type_for("logo.PNG"), "image/png");
/// assert_eq!(content_type_for("README"), "application/octet-stream");
/// ```
pub fn content_type_for(path: impl AsRef<Path>) -> &'static str {
    let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "zip" => "application/zip",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
