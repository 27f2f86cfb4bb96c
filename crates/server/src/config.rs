//! Server bind configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Well-known ports
pub mod ports {
    /// REST port of the physical PHAROS controller
    pub const PHAROS_HTTP: u16 = 20020;
    /// Lowest port accepted for explicit binding
    pub const MIN_UNPRIVILEGED: u16 = 1024;
}

/// Where the HTTP server binds.
///
/// Port `0` asks the OS for an ephemeral port; tests rely on it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "127.0.0.1")
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback on an ephemeral port
    pub fn ephemeral() -> Self {
        Self::new("127.0.0.1", 0)
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", ports::PHAROS_HTTP)
    }
}
