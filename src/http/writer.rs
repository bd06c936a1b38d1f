use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::Config;
use crate::http::resolver::ServedResource;
use crate::http::response::{ResponseHead, StatusCode, http_date};
use crate::http::substitute::TokenSubstituter;

/// Body sent in place of the file when it cannot be opened.
pub const UNREADABLE_BODY: &[u8] = b"Error: the requested resource could not be read.\n";

/// Streams one response: the fixed header block, then the resource body
/// in chunks with the date and server tokens substituted.
pub struct ResponseWriter {
    head: ResponseHead,
    location: Option<PathBuf>,
    substituter: TokenSubstituter,
    chunk_size: usize,
    written: usize,
}

impl ResponseWriter {
    pub fn new(cfg: &Config, status: StatusCode, resource: &ServedResource) -> Self {
        Self::at(cfg, status, resource, SystemTime::now())
    }

    /// Like [`ResponseWriter::new`] but dated `now`. The same instant is
    /// used for the `Date:` header and for `<cs371date>`.
    pub fn at(cfg: &Config, status: StatusCode, resource: &ServedResource, now: SystemTime) -> Self {
        let date = http_date(now);
        let substituter = TokenSubstituter::new(&date, &cfg.server_name);

        Self {
            head: ResponseHead {
                status,
                date,
                server: cfg.server_name.clone(),
                content_type: resource.mime_type.to_string(),
            },
            location: resource.location.clone(),
            substituter,
            chunk_size: cfg.chunk_size.max(1),
            written: 0,
        }
    }

    /// Total bytes written to the stream so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let head = self.head.serialize();
        stream
            .write_all(&head)
            .await
            .context("writing response head")?;
        self.written += head.len();

        match open_regular(self.location.as_deref()).await {
            Ok(file) => self.stream_body(file, stream).await?,
            Err(e) => {
                warn!(location = ?self.location, error = %e, "cannot open resource");
                stream
                    .write_all(UNREADABLE_BODY)
                    .await
                    .context("writing error body")?;
                self.written += UNREADABLE_BODY.len();
            }
        }

        stream.flush().await.context("flushing response")?;
        Ok(())
    }

    async fn stream_body<W>(&mut self, mut file: File, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::with_capacity(self.chunk_size);

        loop {
            buf.clear();
            let n = (&mut file)
                .take(self.chunk_size as u64)
                .read_buf(&mut buf)
                .await
                .with_context(|| format!("reading {:?}", self.location))?;
            if n == 0 {
                break;
            }

            let ready = self.substituter.feed(&buf);
            stream
                .write_all(&ready)
                .await
                .context("writing response body")?;
            self.written += ready.len();
        }

        let tail = self.substituter.finish();
        stream
            .write_all(&tail)
            .await
            .context("writing response body")?;
        self.written += tail.len();

        debug!(location = ?self.location, bytes = self.written, "body streamed");
        Ok(())
    }
}

/// Opens `location` only if it names a regular file.
async fn open_regular(location: Option<&Path>) -> io::Result<File> {
    let location = location.ok_or_else(|| {
        io::Error::new(io::ErrorKind::PermissionDenied, "path is outside the content root")
    })?;

    let file = File::open(location).await?;
    if !file.metadata().await?.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"));
    }
    Ok(file)
}
