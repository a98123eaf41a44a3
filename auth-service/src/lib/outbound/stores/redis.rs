use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;

use crate::domain::store::StoreError;
use crate::domain::store::VolatileStore;

/// Redis-backed volatile store.
///
/// The connection manager reconnects on its own; each call clones the
/// handle, which only bumps a reference count.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Open a managed connection to `url`.
    ///
    /// # Errors
    /// * `ConnectionFailed` - Invalid URL or the server is unreachable
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl VolatileStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(|e| StoreError::CommandFailed(format!("Redis SETEX failed: {}", e)))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();

        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| StoreError::CommandFailed(format!("Redis GET failed: {}", e)))
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();

        conn.del::<_, ()>(key)
            .await
            .map_err(|e| StoreError::CommandFailed(format!("Redis DEL failed: {}", e)))
    }
}
