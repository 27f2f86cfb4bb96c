//! Port checks run before the server binds
//!
//! The availability probe is advisory: another process can take the port
//! between the check and the real bind.

use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::{ports, ServerConfig};
use crate::error::{Result, ServerError};

/// Probe-bind the configured address and release it again.
pub async fn validate_port_available(config: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    debug!(%addr, "Checking HTTP port");

    match TcpListener::bind(&addr).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(addr.clone(), e))?;
            drop(listener);

            info!(%local_addr, "HTTP port is available");
            Ok(())
        }
        Err(e) => {
            error!(port = config.port, %e, "HTTP port is NOT available");
            Err(ServerError::port_in_use(config.port, e.to_string()))
        }
    }
}

/// Reject port 0 and privileged ports.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port < ports::MIN_UNPRIVILEGED {
        Err(ServerError::ConfigError(format!(
            "Port must be between {} and 65535, got {}",
            ports::MIN_UNPRIVILEGED,
            port
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port_range() {
        assert!(validate_port_range(0).is_err());
        assert!(validate_port_range(80).is_err());
        assert!(validate_port_range(1023).is_err());
        assert!(validate_port_range(1024).is_ok());
        assert!(validate_port_range(20020).is_ok());
        assert!(validate_port_range(65535).is_ok());
    }

    #[tokio::test]
    async fn test_occupied_port_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = ServerConfig::new("127.0.0.1", port);

        let err = validate_port_available(&config).await.unwrap_err();
        assert!(matches!(err, ServerError::PortInUse { port: p, .. } if p == port));

        drop(listener);
        assert!(validate_port_available(&config).await.is_ok());
    }
}
