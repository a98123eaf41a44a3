use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error for volatile store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Connection to volatile store failed: {0}")]
    ConnectionFailed(String),

    #[error("Volatile store command failed: {0}")]
    CommandFailed(String),
}

/// Expiring key/value store (Redis in production).
///
/// Each operation is atomic on its own; `set` overwrites and restarts the TTL.
#[async_trait]
pub trait VolatileStore: Send + Sync + 'static {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn del(&self, key: &str) -> Result<(), StoreError>;
}
