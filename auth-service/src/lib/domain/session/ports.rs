use std::time::Duration;

use async_trait::async_trait;
use auth::TokenPair;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RefreshTokenStatus;
use crate::domain::store::StoreError;

/// Port for session operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identity or wrong password (indistinguishable)
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, SessionError>;

    /// Exchange a refresh token for a new pair; both tokens are rotated.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Signature, expiry, issuer or kind check failed
    /// * `RefreshTokenRevoked` - Tracking is enabled and the token is not valid
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError>;
}

/// Server-side refresh-token state.
///
/// Without tracking a refresh token can be replayed until it expires; with
/// it each token can be exchanged once.
#[async_trait]
pub trait RefreshTokenRegistry: Send + Sync + 'static {
    /// `false` when refresh tokens are not tracked at all.
    fn tracks_tokens(&self) -> bool;

    async fn record(&self, jti: Uuid, generation: u32, ttl: Duration) -> Result<(), StoreError>;

    async fn status(&self, jti: Uuid) -> Result<RefreshTokenStatus, StoreError>;

    async fn revoke(&self, jti: Uuid, generation: u32, ttl: Duration) -> Result<(), StoreError>;
}
