//! Server lifecycle for the virtual laser
//!
//! The REST surface is served by [`HttpServer`], which implements the
//! [`Server`] trait. [`ServerExt`] adds `spawn()` and `run_with_ctrl_c()`.
//!
//! Shutdown is coordinated with a `CancellationToken` from `tokio_util`; the
//! [`ShutdownController`] cancels it on Ctrl+C.
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! let config = ServerConfig::new("127.0.0.1", 20020);
//! HttpServer::new(config, router).run_with_ctrl_c().await?;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::{ports, ServerConfig};
pub use error::{Result, ServerError};
pub use http::HttpServer;
pub use port_validator::{validate_port_available, validate_port_range};
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
