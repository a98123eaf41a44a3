use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::session::models::RefreshTokenStatus;
use crate::domain::session::ports::RefreshTokenRegistry;
use crate::domain::store::StoreError;
use crate::domain::store::VolatileStore;

fn registry_key(jti: Uuid) -> String {
    format!("refresh_token:{jti}")
}

/// Registry used when tracking is disabled: records nothing, accepts all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UntrackedRefreshTokens;

#[async_trait]
impl RefreshTokenRegistry for UntrackedRefreshTokens {
    fn tracks_tokens(&self) -> bool {
        false
    }

    async fn record(&self, _jti: Uuid, _generation: u32, _ttl: Duration) -> Result<(), StoreError> {
        Ok(())
    }

    async fn status(&self, _jti: Uuid) -> Result<RefreshTokenStatus, StoreError> {
        Ok(RefreshTokenStatus::Untracked)
    }

    async fn revoke(&self, _jti: Uuid, _generation: u32, _ttl: Duration) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Registry keeping `refresh_token:<jti>` entries in a volatile store.
///
/// Entries live as long as the token they describe, so an expired token
/// reads back as `Unknown`.
pub struct VolatileRefreshTokenRegistry<S: VolatileStore> {
    store: Arc<S>,
}

impl<S: VolatileStore> VolatileRefreshTokenRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: VolatileStore> RefreshTokenRegistry for VolatileRefreshTokenRegistry<S> {
    fn tracks_tokens(&self) -> bool {
        true
    }

    async fn record(&self, jti: Uuid, generation: u32, ttl: Duration) -> Result<(), StoreError> {
        let status = RefreshTokenStatus::Valid { generation };
        self.store
            .set(&registry_key(jti), &status.to_string(), ttl)
            .await
    }

    async fn status(&self, jti: Uuid) -> Result<RefreshTokenStatus, StoreError> {
        match self.store.get(&registry_key(jti)).await? {
            Some(stored) => stored.parse().map_err(StoreError::CommandFailed),
            None => Ok(RefreshTokenStatus::Unknown),
        }
    }

    async fn revoke(&self, jti: Uuid, generation: u32, ttl: Duration) -> Result<(), StoreError> {
        let status = RefreshTokenStatus::Revoked { generation };
        self.store
            .set(&registry_key(jti), &status.to_string(), ttl)
            .await
    }
}
