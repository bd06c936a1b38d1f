#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use webworker::config::Config;
use webworker::http::connection::Connection;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A throwaway content root under the system temp dir, removed on drop.
pub struct ContentRoot {
    path: PathBuf,
}

impl ContentRoot {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "webworker-test-{}-{}",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn with_file(self, name: &str, contents: impl AsRef<[u8]>) -> Self {
        let target = self.path.join(name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, contents).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> Config {
        Config {
            content_root: self.path.clone(),
            server_name: "test-server".to_string(),
            ..Config::default()
        }
    }
}

impl Drop for ContentRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A site with the default and fallback documents in place.
pub fn site() -> ContentRoot {
    ContentRoot::new()
        .with_file("home.html", "<h1>Home</h1>\n")
        .with_file("404.html", "<h1>Not here</h1>\n")
}

/// Sends `request` to a fresh worker over an in-memory pipe and returns
/// everything written back before the worker closed the stream.
pub async fn serve(cfg: Config, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(8 * 1024);

    let worker = tokio::spawn(async move {
        let mut conn = Connection::new(server, Arc::new(cfg));
        conn.run().await
    });

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();
    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    worker.await.unwrap().unwrap();
    response
}

/// Splits a raw response at the first blank line into header lines and body.
pub fn split_response(raw: &[u8]) -> (Vec<String>, Vec<u8>) {
    let sep = raw
        .windows(2)
        .position(|w| w == b"\n\n")
        .expect("response has no header terminator");
    let head = String::from_utf8(raw[..sep].to_vec()).unwrap();
    let lines = head.split('\n').map(str::to_string).collect();
    (lines, raw[sep + 2..].to_vec())
}

/// Translates `/` to the host separator.
pub fn host(path: &str) -> String {
    path.replace('/', std::path::MAIN_SEPARATOR_STR)
}
