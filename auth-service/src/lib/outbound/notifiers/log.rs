use async_trait::async_trait;

use crate::domain::authority::models::PhoneNumber;
use crate::domain::recovery::errors::NotifierError;
use crate::domain::recovery::models::RecoveryCode;
use crate::domain::recovery::ports::RecoveryNotifier;

/// Writes recovery codes to the service log.
///
/// Development only: anyone with log access can reset any password.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRecoveryNotifier;

#[async_trait]
impl RecoveryNotifier for LogRecoveryNotifier {
    async fn send(&self, phone: &PhoneNumber, code: &RecoveryCode) -> Result<(), NotifierError> {
        tracing::info!(phone = %phone, code = code.as_str(), "Password reset code issued");
        Ok(())
    }
}
