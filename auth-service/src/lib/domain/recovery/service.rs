use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::authority::models::check_password_strength;
use crate::domain::authority::models::PhoneNumber;
use crate::domain::authority::ports::AuthorityRepository;
use crate::domain::recovery::errors::RecoveryError;
use crate::domain::recovery::models::recovery_key;
use crate::domain::recovery::models::RecoveryCode;
use crate::domain::recovery::models::ResetPasswordCommand;
use crate::domain::recovery::ports::RecoveryNotifier;
use crate::domain::recovery::ports::RecoveryServicePort;
use crate::domain::store::VolatileStore;

/// Default lifetime of a recovery code.
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(300);

/// Domain service for password recovery by phone.
pub struct RecoveryService<AR, VS, RN>
where
    AR: AuthorityRepository,
    VS: VolatileStore,
    RN: RecoveryNotifier,
{
    repository: Arc<AR>,
    store: Arc<VS>,
    notifier: Arc<RN>,
    authenticator: Arc<Authenticator>,
    code_ttl: Duration,
}

impl<AR, VS, RN> RecoveryService<AR, VS, RN>
where
    AR: AuthorityRepository,
    VS: VolatileStore,
    RN: RecoveryNotifier,
{
    pub fn new(
        repository: Arc<AR>,
        store: Arc<VS>,
        notifier: Arc<RN>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            store,
            notifier,
            authenticator,
            code_ttl: DEFAULT_CODE_TTL,
        }
    }

    pub fn with_code_ttl(mut self, code_ttl: Duration) -> Self {
        self.code_ttl = code_ttl;
        self
    }
}

#[async_trait]
impl<AR, VS, RN> RecoveryServicePort for RecoveryService<AR, VS, RN>
where
    AR: AuthorityRepository,
    VS: VolatileStore,
    RN: RecoveryNotifier,
{
    async fn forgot_password(&self, phone: &PhoneNumber) -> Result<(), RecoveryError> {
        let authority = self
            .repository
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| RecoveryError::NotFound(phone.to_string()))?;

        let code = RecoveryCode::generate();
        self.store
            .set(&recovery_key(phone), code.as_str(), self.code_ttl)
            .await?;

        self.notifier.send(phone, &code).await.map_err(|e| {
            tracing::error!(
                authority_id = %authority.id,
                error = %e,
                "Recovery code could not be delivered"
            );
            RecoveryError::from(e)
        })?;

        tracing::info!(
            authority_id = %authority.id,
            ttl_secs = self.code_ttl.as_secs(),
            "Recovery code issued"
        );

        Ok(())
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), RecoveryError> {
        if command.new_password != command.repeat_password {
            return Err(RecoveryError::PasswordMismatch);
        }
        check_password_strength(&command.new_password)?;

        let key = recovery_key(&command.phone);
        match self.store.get(&key).await? {
            Some(stored) if stored == command.code => {}
            _ => {
                tracing::warn!(phone = %command.phone, "Invalid or expired recovery code presented");
                return Err(RecoveryError::InvalidOrExpiredCode);
            }
        }

        let authority = self
            .repository
            .find_by_phone(&command.phone)
            .await?
            .ok_or_else(|| RecoveryError::NotFound(command.phone.to_string()))?;

        let password_hash = self
            .authenticator
            .hash_password(&command.new_password)
            .map_err(|e| RecoveryError::PasswordHash(e.to_string()))?;

        self.repository
            .update_password(&authority.id, &password_hash)
            .await?;

        if let Err(e) = self.store.del(&key).await {
            tracing::warn!(
                authority_id = %authority.id,
                error = %e,
                "Failed to delete used recovery code"
            );
        }

        tracing::info!(authority_id = %authority.id, "Password reset");

        Ok(())
    }
}
