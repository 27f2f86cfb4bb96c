//! Graceful shutdown on Ctrl+C

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Owns the root cancellation token of the process.
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller whose token is cancelled when the process receives Ctrl+C.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, shutting down virtual laser");
                    token.cancel();
                }
                Err(e) => {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
            }
        });

        controller
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn shutdown(&self) {
        info!("Manual shutdown triggered");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
