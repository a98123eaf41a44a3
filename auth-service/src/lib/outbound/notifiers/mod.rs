pub mod log;
pub mod webhook;

use async_trait::async_trait;

pub use self::log::LogRecoveryNotifier;
pub use webhook::WebhookRecoveryNotifier;

use crate::domain::authority::models::PhoneNumber;
use crate::domain::recovery::errors::NotifierError;
use crate::domain::recovery::models::RecoveryCode;
use crate::domain::recovery::ports::RecoveryNotifier;

/// Notifier selected at startup from configuration.
pub enum ConfiguredNotifier {
    Log(LogRecoveryNotifier),
    Webhook(WebhookRecoveryNotifier),
}

#[async_trait]
impl RecoveryNotifier for ConfiguredNotifier {
    async fn send(&self, phone: &PhoneNumber, code: &RecoveryCode) -> Result<(), NotifierError> {
        match self {
            ConfiguredNotifier::Log(notifier) => notifier.send(phone, code).await,
            ConfiguredNotifier::Webhook(notifier) => notifier.send(phone, code).await,
        }
    }
}
