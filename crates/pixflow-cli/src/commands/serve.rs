//! Serve command
//!
//! Runs the HTTP server until Ctrl-C.

use crate::ServeArgs;
use anyhow::{Context, Result};
use pixflow_server::{AppState, ServerConfig, start_server};
use std::net::SocketAddr;
use tracing::info;

pub fn run(args: ServeArgs) -> Result<()> {
    let config = resolve(&args, super::load_config(args.config.as_deref())?);
    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen))?;
    let state = AppState::from_config(&config).context("Invalid pipeline configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let handle = start_server(addr, state)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        println!("Listening on http://{}/processImage", handle.local_addr());

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
        info!("Ctrl-C received, shutting down");
        handle.shutdown().await;
        Ok::<_, anyhow::Error>(())
    })
}

fn resolve(args: &ServeArgs, mut config: ServerConfig) -> ServerConfig {
    if let Some(listen) = &args.listen {
        config.listen = listen.clone();
    }
    if let Some(mb) = args.max_body_mb {
        config.max_body_mb = mb;
    }
    config
}
