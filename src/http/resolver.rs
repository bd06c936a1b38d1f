//! Maps a normalized request path onto a file under the content root.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::http::mime::content_type_for;
use crate::http::request::ResolvedPath;
use crate::http::response::StatusCode;

/// The file chosen to answer a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedResource {
    /// Path relative to the content root
    pub path: ResolvedPath,
    /// `path` joined onto the content root; `None` when the path would
    /// escape it
    pub location: Option<PathBuf>,
    /// Whether a regular file was found at `location` when resolving
    pub exists: bool,
    /// Content type derived from the file extension
    pub mime_type: &'static str,
}

/// Resolves `path` against the content root.
///
/// The status is decided by the first lookup only: a missing file yields
/// `NotFound`, and the fallback document becomes the resource instead. The
/// fallback is not checked further; if it is missing too, the writer
/// reports that while streaming.
pub async fn resolve(cfg: &Config, path: ResolvedPath) -> (ServedResource, StatusCode) {
    let requested = lookup(&cfg.content_root, path).await;
    if requested.exists {
        debug!(path = %requested.path, mime = requested.mime_type, "resolved resource");
        return (requested, StatusCode::Ok);
    }

    debug!(path = %requested.path, "resource not found, serving fallback document");
    let fallback = ResolvedPath::new(cfg.fallback_document.clone());
    let resource = lookup(&cfg.content_root, fallback).await;
    if !resource.exists {
        warn!(path = %resource.path, "fallback document is missing");
    }

    (resource, StatusCode::NotFound)
}

async fn lookup(root: &Path, path: ResolvedPath) -> ServedResource {
    let mime_type = content_type_for(path.as_str());

    let Some(location) = confine(root, &path) else {
        warn!(path = %path, "rejecting path outside the content root");
        return ServedResource {
            location: None,
            path,
            exists: false,
            mime_type,
        };
    };

    let exists = match tokio::fs::metadata(&location).await {
        Ok(meta) => meta.is_file(),
        Err(e) => {
            debug!(location = %location.display(), error = %e, "stat failed");
            false
        }
    };

    ServedResource {
        path,
        location: Some(location),
        exists,
        mime_type,
    }
}

/// Joins `path` onto `root` unless it could escape it.
fn confine(root: &Path, path: &ResolvedPath) -> Option<PathBuf> {
    let relative = Path::new(path.as_str());
    let safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    safe.then(|| root.join(relative))
}
