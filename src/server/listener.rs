use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!(
        "Listening on {} serving {}",
        cfg.listen_addr,
        cfg.content_root.display()
    );

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let cfg = cfg.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, cfg);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
