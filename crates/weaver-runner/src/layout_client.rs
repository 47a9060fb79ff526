use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{debug, info};
use weaver_core::config::ServerConfig;
use weaver_core::LayoutPayload;

/// The layout server could not supply a layout
///
/// Never fatal: the session falls back to offline generation with a notice.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("layout server unreachable: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("layout response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fetches layout documents from the layout server
///
/// Wire format: connect and read one JSON document until EOF.
#[derive(Debug, Clone)]
pub struct LayoutClient {
    server: ServerConfig,
}

impl LayoutClient {
    pub fn new(server: ServerConfig) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Fetch one layout, bounded by the configured timeout
    pub async fn fetch(&self) -> Result<LayoutPayload, FetchError> {
        let deadline = self.server.timeout();
        match tokio::time::timeout(deadline, self.fetch_inner()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(deadline)),
        }
    }

    async fn fetch_inner(&self) -> Result<LayoutPayload, FetchError> {
        let addr = self.server.to_string();
        debug!(target: "layout", "Fetching layout from {}", addr);

        let mut stream = TcpStream::connect(&addr).await?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;

        let payload: LayoutPayload = serde_json::from_slice(&buf)?;
        info!(
            target: "layout",
            "Received {}x{} layout from {}",
            payload.rows, payload.cols, addr
        );
        Ok(payload)
    }
}
