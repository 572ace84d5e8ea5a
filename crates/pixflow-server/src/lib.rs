//! # pixflow-server
//!
//! HTTP front end for the pixflow pipeline, built on axum.
//!
//! ```rust,ignore
//! use pixflow_server::{AppState, ServerConfig, start_server};
//!
//! let config = ServerConfig::default();
//! let handle = start_server(config.listen.parse()?, AppState::from_config(&config)?).await?;
//! tokio::signal::ctrl_c().await?;
//! handle.shutdown().await;
//! ```
//!
//! See [`router`] for the endpoint contract.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::{AppState, build_router};
pub use server::{ServerHandle, start_server};
