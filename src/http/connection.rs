use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::http::parser::read_request;
use crate::http::request::ResolvedPath;
use crate::http::resolver::{ServedResource, resolve};
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

/// One accepted connection, served exactly once and then closed.
pub struct Connection<S> {
    stream: BufReader<S>,
    config: Arc<Config>,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    Reading,
    Resolving(ResolvedPath),
    Writing(ServedResource, StatusCode),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream: BufReader::new(stream),
            config,
            state: ConnectionState::Reading,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Runs the request/response cycle, then flushes and shuts the stream
    /// down. Stage failures are logged here; only a failure to close the
    /// stream is returned.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let path = read_request(&mut self.stream, &self.config).await;
                    self.state = ConnectionState::Resolving(path);
                }

                ConnectionState::Resolving(path) => {
                    let (resource, status) = resolve(&self.config, path).await;
                    self.state = ConnectionState::Writing(resource, status);
                }

                ConnectionState::Writing(resource, status) => {
                    let mut writer = ResponseWriter::new(&self.config, status, &resource);
                    match writer.write_to_stream(self.stream.get_mut()).await {
                        Ok(()) => info!(
                            path = %resource.path,
                            status = status.as_u16(),
                            bytes = writer.written(),
                            "response sent"
                        ),
                        Err(e) => warn!(
                            path = %resource.path,
                            status = status.as_u16(),
                            error = %format!("{e:#}"),
                            "response aborted"
                        ),
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        self.close().await
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        let stream = self.stream.get_mut();
        stream.flush().await.context("flushing connection")?;
        stream.shutdown().await.context("closing connection")?;
        Ok(())
    }
}
