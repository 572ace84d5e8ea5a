//! Server lifecycle: bind, spawn `axum::serve` in the background, and stop
//! it through a shutdown channel.

use std::io;
use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::router::{AppState, build_router};

/// Handle to a running server.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) closes
/// the channel, which also stops the server.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections, lets in-flight requests finish and waits
    /// for the server task to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("shutdown signal sent");
        }
        if let Err(e) = (&mut self.task).await {
            tracing::error!("server task failed: {e}");
        }
    }
}

/// Binds `addr` and serves the processing router in a background task.
pub async fn start_server(addr: SocketAddr, state: AppState) -> io::Result<ServerHandle> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = build_router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("server received shutdown signal");
        };

        tracing::info!(%addr, "server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("server error: {e}");
        }

        tracing::info!("server stopped");
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
