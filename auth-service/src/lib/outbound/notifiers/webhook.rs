use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::authority::models::PhoneNumber;
use crate::domain::recovery::errors::NotifierError;
use crate::domain::recovery::models::RecoveryCode;
use crate::domain::recovery::ports::RecoveryNotifier;

/// Delivers recovery codes by POSTing `{phone, code}` to an SMS gateway.
pub struct WebhookRecoveryNotifier {
    url: String,
    timeout: Duration,
    http_client: Client,
}

impl WebhookRecoveryNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration, http_client: Client) -> Self {
        Self {
            url: url.into(),
            timeout,
            http_client,
        }
    }
}

#[derive(Serialize)]
struct RecoveryMessage<'a> {
    phone: &'a str,
    code: &'a str,
}

#[async_trait]
impl RecoveryNotifier for WebhookRecoveryNotifier {
    async fn send(&self, phone: &PhoneNumber, code: &RecoveryCode) -> Result<(), NotifierError> {
        let response = self
            .http_client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&RecoveryMessage {
                phone: phone.as_str(),
                code: code.as_str(),
            })
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError::DeliveryFailed(format!(
                "gateway returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
