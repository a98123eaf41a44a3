use std::sync::Arc;
use std::time::Duration;

use crate::domain::registration::models::ReconcileReport;
use crate::domain::registration::ports::RegistrationServicePort;

/// Periodically reconciles provisioning requests left unfinished.
pub struct ProvisioningSweeper {
    service: Arc<dyn RegistrationServicePort>,
    interval: Duration,
    stale_after: chrono::Duration,
}

impl ProvisioningSweeper {
    pub fn new(
        service: Arc<dyn RegistrationServicePort>,
        interval: Duration,
        stale_after: chrono::Duration,
    ) -> Self {
        Self {
            service,
            interval,
            stale_after,
        }
    }

    /// Run forever; a failed sweep is logged and retried on the next tick.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            stale_after_secs = self.stale_after.num_seconds(),
            "Provisioning sweeper started"
        );

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    /// One pass over stale requests.
    pub async fn sweep_once(&self) -> Option<ReconcileReport> {
        match self.service.reconcile_stale(self.stale_after).await {
            Ok(report) => {
                if report.examined > 0 {
                    tracing::info!(
                        examined = report.examined,
                        completed = report.completed,
                        failed = report.failed,
                        orphaned = report.orphaned,
                        unresolved = report.unresolved,
                        "Provisioning sweep finished"
                    );
                }
                if report.orphaned > 0 {
                    tracing::error!(
                        orphaned = report.orphaned,
                        "Orphaned hospitals need manual action"
                    );
                }
                Some(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Provisioning sweep failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::domain::authority::models::Authority;
    use crate::domain::registration::errors::LedgerError;
    use crate::domain::registration::errors::RegistrationError;
    use crate::domain::registration::models::IdempotencyKey;
    use crate::domain::registration::models::ProvisioningStatus;
    use crate::domain::registration::models::RegisterCommand;

    mock! {
        pub TestRegistrationService {}

        #[async_trait]
        impl RegistrationServicePort for TestRegistrationService {
            async fn register(&self, command: RegisterCommand) -> Result<Authority, RegistrationError>;
            async fn reconcile(&self, key: &IdempotencyKey) -> Result<ProvisioningStatus, RegistrationError>;
            async fn reconcile_stale(&self, older_than: chrono::Duration) -> Result<ReconcileReport, RegistrationError>;
        }
    }

    #[tokio::test]
    async fn test_sweep_uses_configured_threshold() {
        let mut service = MockTestRegistrationService::new();
        service
            .expect_reconcile_stale()
            .withf(|older_than| *older_than == chrono::Duration::seconds(300))
            .times(1)
            .returning(|_| {
                Ok(ReconcileReport {
                    examined: 2,
                    completed: 1,
                    orphaned: 1,
                    ..ReconcileReport::default()
                })
            });

        let sweeper = ProvisioningSweeper::new(
            Arc::new(service),
            Duration::from_secs(60),
            chrono::Duration::seconds(300),
        );

        let report = sweeper.sweep_once().await.unwrap();
        assert_eq!(report.completed, 1);
        assert_eq!(report.orphaned, 1);
    }

    #[tokio::test]
    async fn test_failed_sweep_is_swallowed() {
        let mut service = MockTestRegistrationService::new();
        service
            .expect_reconcile_stale()
            .times(1)
            .returning(|_| Err(LedgerError::DatabaseError("connection reset".to_string()).into()));

        let sweeper = ProvisioningSweeper::new(
            Arc::new(service),
            Duration::from_secs(60),
            chrono::Duration::seconds(300),
        );

        assert!(sweeper.sweep_once().await.is_none());
    }
}
