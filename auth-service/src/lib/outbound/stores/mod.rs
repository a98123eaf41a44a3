pub mod memory;
pub mod redis;
pub mod refresh_tokens;

pub use memory::InMemoryStore;
pub use self::redis::RedisStore;
pub use refresh_tokens::UntrackedRefreshTokens;
pub use refresh_tokens::VolatileRefreshTokenRegistry;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::store::StoreError;
use crate::domain::store::VolatileStore;

/// Volatile store selected at startup: Redis when configured, otherwise
/// process memory.
pub enum ConfiguredStore {
    Redis(RedisStore),
    Memory(InMemoryStore),
}

#[async_trait]
impl VolatileStore for ConfiguredStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        match self {
            ConfiguredStore::Redis(store) => store.set(key, value, ttl).await,
            ConfiguredStore::Memory(store) => store.set(key, value, ttl).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            ConfiguredStore::Redis(store) => store.get(key).await,
            ConfiguredStore::Memory(store) => store.get(key).await,
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        match self {
            ConfiguredStore::Redis(store) => store.del(key).await,
            ConfiguredStore::Memory(store) => store.del(key).await,
        }
    }
}
