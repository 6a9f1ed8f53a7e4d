//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::GatewayError;
use std::io::ErrorKind;
use tracing::{info, warn};

impl HttpServer {
    /// Graceful shutdown signal handler
    pub async fn shutdown_signal() {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    /// Turn a bind failure into an actionable message
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> GatewayError {
        match error.kind() {
            ErrorKind::AddrInUse => GatewayError::server(format!(
                "Port {} is already in use; stop the other process or set GATEWAY_PORT={}",
                port,
                port.saturating_add(1)
            )),
            ErrorKind::PermissionDenied => GatewayError::server(format!(
                "Permission denied for port {}; use a port >= 1024",
                port
            )),
            _ => GatewayError::server(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_format_bind_error_address_in_use() {
        let error = Error::new(ErrorKind::AddrInUse, "Address already in use");
        let message = HttpServer::format_bind_error(error, "0.0.0.0:8080", 8080).to_string();

        assert!(message.contains("8080"));
        assert!(message.contains("already in use"));
        assert!(message.contains("8081"));
    }

    #[test]
    fn test_format_bind_error_permission_denied() {
        let error = Error::new(ErrorKind::PermissionDenied, "Permission denied");
        let message = HttpServer::format_bind_error(error, "0.0.0.0:80", 80).to_string();

        assert!(message.contains("Permission denied for port 80"));
    }

    #[test]
    fn test_format_bind_error_other() {
        let error = Error::other("boom");
        let message = HttpServer::format_bind_error(error, "127.0.0.1:9", 9).to_string();

        assert!(message.contains("Failed to bind to 127.0.0.1:9"));
    }
}
