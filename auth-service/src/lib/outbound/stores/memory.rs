use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::store::StoreError;
use crate::domain::store::VolatileStore;

/// Process-local volatile store.
///
/// Expired entries are dropped lazily on read. Suitable for a single
/// instance or for tests; state is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::CommandFailed("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl VolatileStore for InMemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = Instant::now() + ttl;
        self.lock()?
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock()?;

        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
