use async_trait::async_trait;

use crate::domain::authority::models::PhoneNumber;
use crate::domain::recovery::errors::NotifierError;
use crate::domain::recovery::errors::RecoveryError;
use crate::domain::recovery::models::RecoveryCode;
use crate::domain::recovery::models::ResetPasswordCommand;

/// Port for the credential recovery flow.
#[async_trait]
pub trait RecoveryServicePort: Send + Sync + 'static {
    /// Issue a recovery code for `phone` and deliver it out-of-band.
    ///
    /// Any previous code for the same phone is replaced.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this phone
    /// * `Delivery` - The notifier could not deliver the code
    async fn forgot_password(&self, phone: &PhoneNumber) -> Result<(), RecoveryError>;

    /// Set a new password using a live recovery code.
    ///
    /// # Errors
    /// * `PasswordMismatch` - The two passwords differ; nothing is read or written
    /// * `WeakPassword` - The new password fails the strength rule
    /// * `InvalidOrExpiredCode` - No live code, or a different one
    /// * `NotFound` - No identity with this phone
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), RecoveryError>;
}

/// Out-of-band channel carrying recovery codes (SMS gateway, log).
#[async_trait]
pub trait RecoveryNotifier: Send + Sync + 'static {
    async fn send(&self, phone: &PhoneNumber, code: &RecoveryCode) -> Result<(), NotifierError>;
}
