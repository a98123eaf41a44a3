use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::authority::models::Authority;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::ports::AuthorityRepository;
use crate::domain::registration::errors::LedgerError;
use crate::domain::registration::errors::RegistrationError;
use crate::domain::registration::models::IdempotencyKey;
use crate::domain::registration::models::ProvisioningRequest;
use crate::domain::registration::models::ProvisioningStatus;
use crate::domain::registration::models::ReconcileReport;
use crate::domain::registration::models::RegisterCommand;
use crate::domain::registration::ports::HospitalClient;
use crate::domain::registration::ports::ProvisioningLedger;
use crate::domain::registration::ports::RegistrationServicePort;

/// Orchestrates tenant provisioning across the hospital service and the
/// local identity store.
///
/// The two writes cannot share a transaction and the hospital service offers
/// no delete, so every attempt goes through the provisioning ledger: a
/// failure after the hospital exists leaves a `tenant_created` record that
/// `reconcile` either completes or flags as `orphaned`.
pub struct RegistrationService<AR, HC, PL>
where
    AR: AuthorityRepository,
    HC: HospitalClient,
    PL: ProvisioningLedger,
{
    repository: Arc<AR>,
    hospital_client: Arc<HC>,
    ledger: Arc<PL>,
    authenticator: Arc<Authenticator>,
}

impl<AR, HC, PL> RegistrationService<AR, HC, PL>
where
    AR: AuthorityRepository,
    HC: HospitalClient,
    PL: ProvisioningLedger,
{
    pub fn new(
        repository: Arc<AR>,
        hospital_client: Arc<HC>,
        ledger: Arc<PL>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            hospital_client,
            ledger,
            authenticator,
        }
    }

    /// Create the hospital remotely, then store its administrator.
    async fn provision(&self, request: ProvisioningRequest) -> Result<Authority, RegistrationError> {
        let hospital = match self
            .hospital_client
            .create_hospital(&request.hospital, &request.key)
            .await
        {
            Ok(hospital) => hospital,
            Err(e) => {
                tracing::warn!(
                    idempotency_key = %request.key,
                    hospital_name = %request.hospital.name,
                    error = %e,
                    "Hospital creation failed"
                );
                if let Err(ledger_error) = self.ledger.mark_failed(&request.key, &e.to_string()).await {
                    tracing::error!(
                        idempotency_key = %request.key,
                        error = %ledger_error,
                        "Failed to mark provisioning request as failed"
                    );
                }
                return Err(RegistrationError::Upstream(e));
            }
        };

        tracing::info!(
            idempotency_key = %request.key,
            hospital_id = %hospital.id,
            "Hospital created"
        );

        if let Err(e) = self
            .ledger
            .mark_tenant_created(&request.key, hospital.id)
            .await
        {
            tracing::error!(
                idempotency_key = %request.key,
                hospital_id = %hospital.id,
                error = %e,
                "Failed to record created hospital"
            );
        }

        self.store_administrator(&request, hospital.id).await
    }

    async fn store_administrator(
        &self,
        request: &ProvisioningRequest,
        hospital_id: HospitalId,
    ) -> Result<Authority, RegistrationError> {
        match self
            .repository
            .create(request.administrator_identity(hospital_id))
            .await
        {
            Ok(created) => {
                if let Err(e) = self.ledger.mark_completed(&request.key, created.id).await {
                    tracing::error!(
                        idempotency_key = %request.key,
                        authority_id = %created.id,
                        error = %e,
                        "Failed to mark provisioning request as completed"
                    );
                }

                tracing::info!(
                    idempotency_key = %request.key,
                    hospital_id = %hospital_id,
                    authority_id = %created.id,
                    "Hospital registration completed"
                );

                Ok(created)
            }
            Err(e) => {
                let conflict = matches!(e, AuthorityError::AlreadyExists);
                let reason = e.to_string();

                tracing::error!(
                    idempotency_key = %request.key,
                    hospital_id = %hospital_id,
                    conflict,
                    error = %reason,
                    "Hospital created but administrator could not be stored: orphaned tenant"
                );

                if let Err(ledger_error) = self.ledger.note_error(&request.key, &reason).await {
                    tracing::error!(
                        idempotency_key = %request.key,
                        error = %ledger_error,
                        "Failed to record provisioning error"
                    );
                }

                Err(RegistrationError::OrphanedTenant {
                    hospital_id,
                    idempotency_key: request.key,
                    conflict,
                    reason,
                })
            }
        }
    }

    /// The administrator stored by an earlier attempt whose completion was
    /// never recorded.
    async fn stored_administrator(
        &self,
        request: &ProvisioningRequest,
        hospital_id: HospitalId,
    ) -> Result<Option<Authority>, RegistrationError> {
        let existing = self
            .repository
            .find_by_phone(&request.administrator.phone)
            .await?;

        Ok(existing.filter(|authority| {
            authority.belongs_to(hospital_id)
                && authority.national_id == request.administrator.national_id
        }))
    }

    /// Map the outcome of a resumed attempt to the status it leaves behind.
    async fn settle(
        &self,
        key: &IdempotencyKey,
        outcome: Result<Authority, RegistrationError>,
    ) -> Result<ProvisioningStatus, RegistrationError> {
        match outcome {
            Ok(_) => Ok(ProvisioningStatus::Completed),
            Err(RegistrationError::Upstream(_)) => Ok(ProvisioningStatus::Failed),
            Err(RegistrationError::OrphanedTenant {
                conflict: true,
                reason,
                hospital_id,
                ..
            }) => {
                self.ledger.mark_orphaned(key, &reason).await?;
                tracing::error!(
                    idempotency_key = %key,
                    hospital_id = %hospital_id,
                    "Provisioning request orphaned: manual action required"
                );
                Ok(ProvisioningStatus::Orphaned)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<AR, HC, PL> RegistrationServicePort for RegistrationService<AR, HC, PL>
where
    AR: AuthorityRepository,
    HC: HospitalClient,
    PL: ProvisioningLedger,
{
    async fn register(&self, command: RegisterCommand) -> Result<Authority, RegistrationError> {
        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| RegistrationError::PasswordHash(e.to_string()))?;

        let administrator = &command.administrator;
        if self
            .repository
            .exists(
                &administrator.national_id,
                &administrator.email,
                &administrator.phone,
            )
            .await?
        {
            return Err(RegistrationError::AlreadyExists);
        }

        let request = ProvisioningRequest::new(command.hospital, command.administrator, password_hash);
        self.ledger.record(&request).await?;

        tracing::info!(
            idempotency_key = %request.key,
            hospital_name = %request.hospital.name,
            "Provisioning request recorded"
        );

        self.provision(request).await
    }

    async fn reconcile(&self, key: &IdempotencyKey) -> Result<ProvisioningStatus, RegistrationError> {
        let request = self
            .ledger
            .find(key)
            .await?
            .ok_or_else(|| RegistrationError::RequestNotFound(key.to_string()))?;

        match request.status {
            ProvisioningStatus::Completed
            | ProvisioningStatus::Failed
            | ProvisioningStatus::Orphaned => Ok(request.status),
            ProvisioningStatus::TenantCreated => {
                let hospital_id = request.hospital_id.ok_or_else(|| LedgerError::CorruptRecord {
                    key: key.to_string(),
                    reason: "tenant_created without hospital id".to_string(),
                })?;

                if let Some(existing) = self.stored_administrator(&request, hospital_id).await? {
                    self.ledger.mark_completed(key, existing.id).await?;
                    return Ok(ProvisioningStatus::Completed);
                }

                let outcome = self.store_administrator(&request, hospital_id).await;
                self.settle(key, outcome).await
            }
            ProvisioningStatus::Pending => {
                tracing::info!(idempotency_key = %key, "Re-issuing hospital creation");
                let outcome = self.provision(request).await;
                self.settle(key, outcome).await
            }
        }
    }

    async fn reconcile_stale(&self, older_than: Duration) -> Result<ReconcileReport, RegistrationError> {
        let stale = self.ledger.list_stale(Utc::now() - older_than).await?;
        let mut report = ReconcileReport::default();

        for request in stale {
            match self.reconcile(&request.key).await {
                Ok(status) => report.record(status),
                Err(e) => {
                    tracing::warn!(
                        idempotency_key = %request.key,
                        status = %request.status,
                        error = %e,
                        "Reconciliation failed"
                    );
                    report.record(request.status);
                }
            }
        }

        if report.examined > 0 {
            tracing::info!(
                examined = report.examined,
                completed = report.completed,
                failed = report.failed,
                orphaned = report.orphaned,
                unresolved = report.unresolved,
                "Stale provisioning requests reconciled"
            );
        }

        Ok(report)
    }
}
