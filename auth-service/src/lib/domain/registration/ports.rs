use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::authority::models::Authority;
use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::HospitalId;
use crate::domain::registration::errors::HospitalClientError;
use crate::domain::registration::errors::LedgerError;
use crate::domain::registration::errors::RegistrationError;
use crate::domain::registration::models::HospitalProfile;
use crate::domain::registration::models::HospitalRecord;
use crate::domain::registration::models::IdempotencyKey;
use crate::domain::registration::models::ProvisioningRequest;
use crate::domain::registration::models::ProvisioningStatus;
use crate::domain::registration::models::ReconcileReport;
use crate::domain::registration::models::RegisterCommand;

/// Port for hospital registration.
#[async_trait]
pub trait RegistrationServicePort: Send + Sync + 'static {
    /// Create a hospital in the hospital service and its first administrator
    /// locally.
    ///
    /// # Returns
    /// The administrator identity, bound to the new hospital
    ///
    /// # Errors
    /// * `AlreadyExists` - TC, email or phone is taken; the hospital service is not called
    /// * `PasswordHash` - Hashing failed; nothing was written
    /// * `Upstream` - The hospital was not created; no identity was written
    /// * `OrphanedTenant` - The hospital exists but its administrator could not be stored
    /// * `Ledger` - The attempt could not be recorded; the hospital service is not called
    async fn register(&self, command: RegisterCommand) -> Result<Authority, RegistrationError>;

    /// Drive one recorded attempt to a terminal state if possible.
    ///
    /// Idempotent: terminal requests are returned unchanged.
    ///
    /// # Errors
    /// * `RequestNotFound` - No request with this key
    async fn reconcile(&self, key: &IdempotencyKey) -> Result<ProvisioningStatus, RegistrationError>;

    /// Reconcile every unfinished request untouched for at least `older_than`.
    async fn reconcile_stale(&self, older_than: Duration) -> Result<ReconcileReport, RegistrationError>;
}

/// Remote hospital service.
#[async_trait]
pub trait HospitalClient: Send + Sync + 'static {
    /// `POST /api/hospital`; success only on 201.
    ///
    /// # Errors
    /// * `Unreachable` - Network failure or timeout
    /// * `Rejected` - Any status other than 201
    /// * `InvalidResponse` - 201 with an undecodable body
    async fn create_hospital(
        &self,
        hospital: &HospitalProfile,
        key: &IdempotencyKey,
    ) -> Result<HospitalRecord, HospitalClientError>;
}

/// Durable record of registration attempts.
///
/// Every `mark_*` call also refreshes `updated_at`.
#[async_trait]
pub trait ProvisioningLedger: Send + Sync + 'static {
    async fn record(&self, request: &ProvisioningRequest) -> Result<(), LedgerError>;

    async fn find(&self, key: &IdempotencyKey) -> Result<Option<ProvisioningRequest>, LedgerError>;

    async fn mark_tenant_created(&self, key: &IdempotencyKey, hospital_id: HospitalId) -> Result<(), LedgerError>;

    async fn mark_completed(&self, key: &IdempotencyKey, authority_id: AuthorityId) -> Result<(), LedgerError>;

    async fn mark_failed(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError>;

    async fn mark_orphaned(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError>;

    /// Store the latest error without changing the status.
    async fn note_error(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError>;

    /// `pending` and `tenant_created` requests last updated before `before`.
    async fn list_stale(&self, before: DateTime<Utc>) -> Result<Vec<ProvisioningRequest>, LedgerError>;
}
